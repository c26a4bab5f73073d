//! SV annotation report and its summary.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use fxhash::FxHashMap as HashMap;

use crate::vcf::{SvRecord, SvType};

/// Placeholder written for SVs without an annotation.
pub const UNANNOTATED: &str = "NA";

///
/// Annotation labels keyed by SV id, one map per SV type that gets annotated.
///
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SvAnnotations {
    pub del: HashMap<String, String>,
    pub ins: HashMap<String, String>,
}

impl SvAnnotations {
    ///
    /// Write one BEDPE-like line per DEL and INS record:
    /// `chrom1 pos1 chrom2 pos2 svtype id svlen annotation`.
    ///
    /// Records of other types are left out. Returns the counts for the summary.
    ///
    pub fn write_report<'a, W, It>(&self, records: It, out: &mut W) -> io::Result<AnnotationSummary>
    where
        W: Write,
        It: IntoIterator<Item = &'a SvRecord>,
    {
        let mut summary = AnnotationSummary::default();
        for sv in records {
            let annot = match sv.svtype {
                SvType::Del => {
                    summary.del_total += 1;
                    self.del.get(&sv.id)
                }
                SvType::Ins => {
                    summary.ins_total += 1;
                    self.ins.get(&sv.id)
                }
                _ => continue,
            };
            writeln!(out, "{}", bedpe_line(sv, annot.map_or(UNANNOTATED, String::as_str)))?;
        }

        for label in self.del.values() {
            *summary.del.entry(label.clone()).or_default() += 1;
        }
        for label in self.ins.values() {
            *summary.ins.entry(label.clone()).or_default() += 1;
        }
        Ok(summary)
    }

    ///
    /// Write the report to `path` and the summary to `<path>.summary`.
    ///
    pub fn write_report_files<'a, P, It>(&self, records: It, path: P) -> io::Result<AnnotationSummary>
    where
        P: AsRef<Path>,
        It: IntoIterator<Item = &'a SvRecord>,
    {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut out = BufWriter::new(File::create(path)?);
        let summary = self.write_report(records, &mut out)?;
        out.flush()?;

        let mut summary_path = path.as_os_str().to_owned();
        summary_path.push(".summary");
        let mut out = BufWriter::new(File::create(summary_path)?);
        summary.write(&mut out)?;
        out.flush()?;

        Ok(summary)
    }
}

fn bedpe_line(sv: &SvRecord, annot: &str) -> String {
    format!(
        "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
        sv.chrom1,
        sv.pos1,
        sv.chrom2,
        sv.pos2,
        sv.svtype,
        sv.id,
        sv.svlen.map_or(UNANNOTATED.to_string(), |l| l.to_string()),
        annot
    )
}

///
/// Per-label counts of annotated SVs plus the number of DEL and INS records seen.
/// Labels are kept sorted so the summary file is stable between runs.
///
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotationSummary {
    pub del: BTreeMap<String, usize>,
    pub ins: BTreeMap<String, usize>,
    pub del_total: usize,
    pub ins_total: usize,
}

impl AnnotationSummary {
    pub fn write<W: Write>(&self, out: &mut W) -> io::Result<()> {
        write_section(out, "DEL", &self.del, self.del_total)?;
        write_section(out, "INS", &self.ins, self.ins_total)
    }
}

fn write_section<W: Write>(
    out: &mut W,
    svtype: &str,
    counts: &BTreeMap<String, usize>,
    total: usize,
) -> io::Result<()> {
    writeln!(out, "#{} annot summary:", svtype)?;
    writeln!(out, "#sv_type\tannot_type\tnumber")?;
    for (label, n) in counts {
        writeln!(out, "{}\t{}\t{}", svtype, label, n)?;
    }
    writeln!(out, "{}\ttotal\t{}", svtype, total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    fn sv(id: &str, svtype: SvType, svlen: Option<i64>) -> SvRecord {
        SvRecord {
            chrom1: "1".to_string(),
            pos1: 1000,
            chrom2: "1".to_string(),
            pos2: 1300,
            svtype,
            id: id.to_string(),
            svlen,
        }
    }

    #[fixture]
    fn records() -> Vec<SvRecord> {
        vec![
            sv("d1", SvType::Del, Some(-300)),
            sv("i1", SvType::Ins, Some(300)),
            sv("v1", SvType::Inv, None),
            sv("d2", SvType::Del, None),
            sv("i2", SvType::Ins, Some(6000)),
        ]
    }

    #[fixture]
    fn annotations() -> SvAnnotations {
        let mut annotations = SvAnnotations::default();
        annotations.del.insert("d1".to_string(), "Alu".to_string());
        annotations.ins.insert("i1".to_string(), "AluY".to_string());
        annotations.ins.insert("i2".to_string(), "L1HS".to_string());
        annotations
    }

    #[rstest]
    fn test_report_lines(records: Vec<SvRecord>, annotations: SvAnnotations) {
        let mut out = Vec::new();
        annotations.write_report(&records, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "1\t1000\t1\t1300\tDEL\td1\t-300\tAlu\n\
             1\t1000\t1\t1300\tINS\ti1\t300\tAluY\n\
             1\t1000\t1\t1300\tDEL\td2\tNA\tNA\n\
             1\t1000\t1\t1300\tINS\ti2\t6000\tL1HS\n"
        );
    }

    #[rstest]
    fn test_summary(records: Vec<SvRecord>, annotations: SvAnnotations) {
        let summary = annotations.write_report(&records, &mut io::sink()).unwrap();
        assert_eq!(summary.del_total, 2);
        assert_eq!(summary.ins_total, 2);

        let mut out = Vec::new();
        summary.write(&mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "#DEL annot summary:\n#sv_type\tannot_type\tnumber\nDEL\tAlu\t1\nDEL\ttotal\t2\n\
             #INS annot summary:\n#sv_type\tannot_type\tnumber\nINS\tAluY\t1\nINS\tL1HS\t1\nINS\ttotal\t2\n"
        );
    }

    #[rstest]
    fn test_report_files(records: Vec<SvRecord>, annotations: SvAnnotations) {
        let tempdir = tempfile::tempdir().unwrap();
        let path = tempdir.path().join("out/sample.sv.txt");

        let summary = annotations.write_report_files(&records, &path).unwrap();
        assert_eq!(summary.ins.get("L1HS"), Some(&1));

        let report = std::fs::read_to_string(&path).unwrap();
        assert_eq!(report.lines().count(), 4);
        let summary_text = std::fs::read_to_string(tempdir.path().join("out/sample.sv.txt.summary")).unwrap();
        assert!(summary_text.contains("INS\ttotal\t2"));
    }
}
