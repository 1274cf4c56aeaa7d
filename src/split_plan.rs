//! Page ranges for cutting a split document into separate files.
//!
//! Every high-confidence segment marks the start of a new document; the pages
//! before the first one (if any) form a leading part of their own.

use serde::Serialize;
use thiserror::Error;

use crate::jobs::{Job, JobStatus};
use crate::llama::SplitResult;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SplitPlanError {
    #[error("Job is not completed. Current status: {0}")]
    NotCompleted(JobStatus),

    #[error("No high confidence pages found in the result")]
    NoHighConfidencePages,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SplitPlan {
    pub total_pages: u32,
    pub parts: Vec<SplitPart>,
}

/// One output file: an inclusive, 1-based page range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SplitPart {
    pub file_name: String,
    pub start_page: u32,
    pub end_page: u32,
}

impl SplitPlan {
    pub fn for_job(job: &Job) -> Result<Self, SplitPlanError> {
        match (&job.status, &job.result) {
            (JobStatus::Completed, Some(result)) => {
                Self::from_result(result, job.file_name.as_deref())
            }
            _ => Err(SplitPlanError::NotCompleted(job.status)),
        }
    }

    pub fn from_result(result: &SplitResult, file_name: Option<&str>) -> Result<Self, SplitPlanError> {
        let mut starts: Vec<u32> = result
            .segments
            .iter()
            .filter(|s| s.confidence_category == "high")
            .flat_map(|s| s.pages.iter().copied())
            .collect();
        starts.sort_unstable();
        starts.dedup();

        let Some(&first) = starts.first() else {
            return Err(SplitPlanError::NoHighConfidencePages);
        };

        // Uncategorized pages are disallowed, so the segments cover the whole document.
        let total_pages = result
            .segments
            .iter()
            .flat_map(|s| s.pages.iter().copied())
            .max()
            .unwrap_or(first);

        let mut ranges = Vec::with_capacity(starts.len() + 1);
        if first > 1 {
            ranges.push((1, first - 1));
        }
        for (i, &start) in starts.iter().enumerate() {
            let end = starts.get(i + 1).map_or(total_pages, |next| next - 1);
            ranges.push((start, end));
        }

        let base = base_name(file_name.unwrap_or("document.pdf"));
        let parts = ranges
            .into_iter()
            .enumerate()
            .map(|(i, (start_page, end_page))| SplitPart {
                file_name: format!("{base}_part_{}_pages_{start_page}-{end_page}.pdf", i + 1),
                start_page,
                end_page,
            })
            .collect();

        Ok(Self { total_pages, parts })
    }
}

fn base_name(file_name: &str) -> &str {
    file_name
        .rsplit_once('.')
        .map_or(file_name, |(base, _)| base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::JobUpdate;
    use crate::llama::Segment;

    fn segment(pages: &[u32], confidence: &str) -> Segment {
        Segment {
            category: "default".into(),
            pages: pages.to_vec(),
            confidence_category: confidence.into(),
        }
    }

    fn ranges(plan: &SplitPlan) -> Vec<(u32, u32)> {
        plan.parts.iter().map(|p| (p.start_page, p.end_page)).collect()
    }

    #[test]
    fn each_high_page_starts_a_part() {
        let result = SplitResult {
            segments: vec![
                segment(&[1, 2], "high"),
                segment(&[3], "low"),
                segment(&[4, 5, 6], "high"),
            ],
        };
        let plan = SplitPlan::from_result(&result, Some("invoices.pdf")).unwrap();
        assert_eq!(plan.total_pages, 6);
        assert_eq!(ranges(&plan), vec![(1, 1), (2, 3), (4, 4), (5, 5), (6, 6)]);
        assert_eq!(plan.parts[1].file_name, "invoices_part_2_pages_2-3.pdf");
    }

    #[test]
    fn leading_pages_before_first_high_page_form_a_part() {
        let result = SplitResult {
            segments: vec![segment(&[1, 2], "medium"), segment(&[3], "high"), segment(&[4, 5], "low")],
        };
        let plan = SplitPlan::from_result(&result, Some("scan.v2.pdf")).unwrap();
        assert_eq!(ranges(&plan), vec![(1, 2), (3, 5)]);
        assert_eq!(plan.parts[0].file_name, "scan.v2_part_1_pages_1-2.pdf");
        assert_eq!(plan.parts[1].file_name, "scan.v2_part_2_pages_3-5.pdf");
    }

    #[test]
    fn duplicate_and_unsorted_pages_are_normalised() {
        let result = SplitResult {
            segments: vec![segment(&[5, 1], "high"), segment(&[1], "high"), segment(&[2, 3, 4], "low")],
        };
        let plan = SplitPlan::from_result(&result, None).unwrap();
        assert_eq!(ranges(&plan), vec![(1, 4), (5, 5)]);
        assert_eq!(plan.parts[0].file_name, "document_part_1_pages_1-4.pdf");
    }

    #[test]
    fn file_name_without_extension_is_used_whole() {
        let result = SplitResult {
            segments: vec![segment(&[1], "high")],
        };
        let plan = SplitPlan::from_result(&result, Some("README")).unwrap();
        assert_eq!(plan.parts[0].file_name, "README_part_1_pages_1-1.pdf");
    }

    #[test]
    fn no_high_confidence_pages_is_an_error() {
        let result = SplitResult {
            segments: vec![segment(&[1, 2], "low")],
        };
        assert_eq!(
            SplitPlan::from_result(&result, None).unwrap_err(),
            SplitPlanError::NoHighConfidencePages
        );
    }

    #[test]
    fn only_completed_jobs_have_a_plan() {
        let mut job = Job::new(Some("a.pdf".into()));
        assert_eq!(
            SplitPlan::for_job(&job).unwrap_err(),
            SplitPlanError::NotCompleted(JobStatus::Pending)
        );

        job.apply(JobUpdate::Processing).unwrap();
        job.apply(JobUpdate::Completed(SplitResult {
            segments: vec![segment(&[1], "high"), segment(&[2], "high")],
        }))
        .unwrap();
        let plan = SplitPlan::for_job(&job).unwrap();
        assert_eq!(ranges(&plan), vec![(1, 1), (2, 2)]);
    }

    #[test]
    fn not_completed_message() {
        let err = SplitPlanError::NotCompleted(JobStatus::Processing);
        assert_eq!(err.to_string(), "Job is not completed. Current status: processing");
    }
}
