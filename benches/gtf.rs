use criterion::{black_box, criterion_group, criterion_main, Criterion};

use genechunk::gtf;
use genechunk::merge::NativeJoiner;
use genechunk::models::{GenomeId, GenomicInterval, RawFeatureSet, TranscriptRead};
use genechunk::tests::gtf::augustus_transcript;

/// 100 chunks of 100 kb, every chunk predicts 20 genes
///
/// Neighbouring chunks overlap by 20 kb, so every chunk repeats the
/// last four genes of its predecessor.
fn chunk_predictions() -> Vec<RawFeatureSet> {
    let genome = GenomeId::from("hg38");
    (0..100u32)
        .map(|idx| {
            let start = idx * 80_000;
            let chunk = GenomicInterval::new("chr1", u64::from(start), 100_000).unwrap();
            let mut content = String::new();
            for gene in 0..20u32 {
                let tx_start = start + gene * 5_000 + 101;
                content.push_str(&augustus_transcript(
                    "chr1",
                    &format!("g{}.t1", gene + 1),
                    &format!("g{}", gene + 1),
                    &[
                        (tx_start, tx_start + 299),
                        (tx_start + 1000, tx_start + 1199),
                        (tx_start + 2000, tx_start + 2400),
                    ],
                    Some((tx_start + 50, tx_start + 2300)),
                    true,
                    true,
                ));
            }
            RawFeatureSet::new(genome.clone(), chunk, content)
        })
        .collect()
}

fn parse_gtf_bench(c: &mut Criterion) {
    let content: String = chunk_predictions()
        .iter()
        .map(|raw| raw.content())
        .collect();
    c.bench_function("parse chunk predictions", |b| {
        b.iter(|| {
            let transcripts = gtf::Reader::new(black_box(content.as_bytes()))
                .transcripts()
                .unwrap();
            assert!(!transcripts.is_empty());
        })
    });
}

fn join_bench(c: &mut Criterion) {
    let raw_sets = chunk_predictions();
    let joiner = NativeJoiner::new();
    c.bench_function("join chunk predictions", |b| {
        b.iter(|| {
            let transcripts = joiner.join_transcripts(black_box(&raw_sets)).unwrap();
            assert!(!transcripts.is_empty());
        })
    });
}

criterion_group!(gtf, parse_gtf_bench, join_bench);
criterion_main!(gtf);
