//! GTF snippets in the style of AUGUSTUS output

/// [`standard_transcript`](crate::tests::transcripts::standard_transcript) as GTF
pub const STANDARD_GTF: &str = "\
chr1\tAUGUSTUS\tgene\t11\t55\t1\t+\t.\tTest-Gene
chr1\tAUGUSTUS\ttranscript\t11\t55\t1\t+\t.\tTest-Transcript
chr1\tAUGUSTUS\ttss\t11\t11\t.\t+\t.\ttranscript_id \"Test-Transcript\"; gene_id \"Test-Gene\";
chr1\tAUGUSTUS\texon\t11\t15\t.\t+\t.\ttranscript_id \"Test-Transcript\"; gene_id \"Test-Gene\";
chr1\tAUGUSTUS\texon\t21\t25\t.\t+\t.\ttranscript_id \"Test-Transcript\"; gene_id \"Test-Gene\";
chr1\tAUGUSTUS\tstart_codon\t22\t24\t.\t+\t0\ttranscript_id \"Test-Transcript\"; gene_id \"Test-Gene\";
chr1\tAUGUSTUS\tCDS\t22\t25\t1\t+\t0\ttranscript_id \"Test-Transcript\"; gene_id \"Test-Gene\";
chr1\tAUGUSTUS\texon\t31\t35\t.\t+\t.\ttranscript_id \"Test-Transcript\"; gene_id \"Test-Gene\";
chr1\tAUGUSTUS\tCDS\t31\t35\t1\t+\t2\ttranscript_id \"Test-Transcript\"; gene_id \"Test-Gene\";
chr1\tAUGUSTUS\texon\t41\t45\t.\t+\t.\ttranscript_id \"Test-Transcript\"; gene_id \"Test-Gene\";
chr1\tAUGUSTUS\tstop_codon\t41\t43\t.\t+\t0\ttranscript_id \"Test-Transcript\"; gene_id \"Test-Gene\";
chr1\tAUGUSTUS\texon\t51\t55\t.\t+\t.\ttranscript_id \"Test-Transcript\"; gene_id \"Test-Gene\";
chr1\tAUGUSTUS\ttts\t55\t55\t.\t+\t.\ttranscript_id \"Test-Transcript\"; gene_id \"Test-Gene\";
";

/// A plus strand transcript whose CDS runs into position 300 without a stop codon
pub const TRUNCATED_GTF: &str = "\
chr1\tAUGUSTUS\ttss\t200\t200\t.\t+\t.\ttranscript_id \"g3.t1\"; gene_id \"g3\";
chr1\tAUGUSTUS\texon\t200\t230\t.\t+\t.\ttranscript_id \"g3.t1\"; gene_id \"g3\";
chr1\tAUGUSTUS\tstart_codon\t210\t212\t.\t+\t0\ttranscript_id \"g3.t1\"; gene_id \"g3\";
chr1\tAUGUSTUS\tCDS\t210\t230\t.\t+\t0\ttranscript_id \"g3.t1\"; gene_id \"g3\";
chr1\tAUGUSTUS\texon\t270\t300\t.\t+\t.\ttranscript_id \"g3.t1\"; gene_id \"g3\";
chr1\tAUGUSTUS\tCDS\t270\t300\t.\t+\t0\ttranscript_id \"g3.t1\"; gene_id \"g3\";
";

/// Builds AUGUSTUS-like GTF lines for a single plus strand transcript
///
/// `cds` is the CDS including the stop codon; `start_codon` and
/// `stop_codon` control whether the codon lines are written. The stop
/// codon is excluded from the `CDS` lines, as AUGUSTUS does.
pub fn augustus_transcript(
    chrom: &str,
    tx_id: &str,
    gene_id: &str,
    exons: &[(u32, u32)],
    cds: Option<(u32, u32)>,
    start_codon: bool,
    stop_codon: bool,
) -> String {
    let attrs = format!("transcript_id \"{}\"; gene_id \"{}\";", tx_id, gene_id);
    let line = |feature: &str, start: u32, end: u32, frame: &str| {
        format!(
            "{}\tAUGUSTUS\t{}\t{}\t{}\t.\t+\t{}\t{}\n",
            chrom, feature, start, end, frame, attrs
        )
    };
    let mut out = String::new();
    out.push_str(&format!(
        "{}\tAUGUSTUS\ttranscript\t{}\t{}\t.\t+\t.\t{}\n",
        chrom,
        exons[0].0,
        exons[exons.len() - 1].1,
        tx_id
    ));
    for (start, end) in exons {
        out.push_str(&line("exon", *start, *end, "."));
    }
    if let Some((cds_start, cds_end)) = cds {
        let coding_end = if stop_codon { cds_end - 3 } else { cds_end };
        let mut offset = 0;
        for (start, end) in exons {
            let s = (*start).max(cds_start);
            let e = (*end).min(coding_end);
            if s <= e {
                out.push_str(&line("CDS", s, e, &((3 - offset % 3) % 3).to_string()));
                offset += e - s + 1;
            }
        }
        if start_codon {
            out.push_str(&line("start_codon", cds_start, cds_start + 2, "0"));
        }
        if stop_codon {
            out.push_str(&line("stop_codon", cds_end - 2, cds_end, "0"));
        }
    }
    out
}
