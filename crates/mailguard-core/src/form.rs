//! Raw form fields and the request builder.

use crate::message::{Attachment, ClassificationRequest, EmailHeaders};

/// The composer's raw inputs, exactly as typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormFields {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
    /// Comma-separated attachment filenames.
    pub attachments_csv: String,
}

impl Default for FormFields {
    fn default() -> Self {
        Self {
            from: "demo@corp.com".into(),
            to: "finance@demo.local".into(),
            subject: "(demo)".into(),
            body: "Paste or type the email body here...".into(),
            attachments_csv: String::new(),
        }
    }
}

/// Canned emails for quick demos.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sample {
    Sensitive,
    Normal,
}

impl Sample {
    pub fn fields(self) -> FormFields {
        match self {
            Self::Sensitive => FormFields {
                from: "alice@corp.com".into(),
                to: "finance@demo.local".into(),
                subject: "Q3 Salary Sheet (Confidential)".into(),
                body: "Team, attached are the confidential salary sheets for Q3. \
                       Please restrict sharing outside payroll."
                    .into(),
                attachments_csv: "q3_salaries.xlsx".into(),
            },
            Self::Normal => FormFields {
                from: "bob@partner.com".into(),
                to: "support@demo.local".into(),
                subject: "Inquiry about product availability".into(),
                body: "Hello team, could you confirm if the 24-port switch is in stock \
                       next week? Thanks."
                    .into(),
                attachments_csv: String::new(),
            },
        }
    }
}

impl FormFields {
    /// Build the wire request. Only the attachment list is transformed;
    /// every other field passes through verbatim.
    pub fn build_request(&self) -> ClassificationRequest {
        ClassificationRequest {
            subject: self.subject.clone(),
            body: self.body.clone(),
            headers: EmailHeaders {
                from: self.from.clone(),
                to: self.to.clone(),
            },
            attachments: parse_attachments(&self.attachments_csv),
        }
    }
}

/// Split a comma-separated filename list, trimming each segment and
/// dropping the ones left empty. Order is preserved.
pub fn parse_attachments(csv: &str) -> Vec<Attachment> {
    csv.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|filename| Attachment {
            filename: filename.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(csv: &str) -> Vec<String> {
        parse_attachments(csv)
            .into_iter()
            .map(|a| a.filename)
            .collect()
    }

    #[test]
    fn splits_and_trims_in_order() {
        assert_eq!(names("example.xlsx, data.csv"), ["example.xlsx", "data.csv"]);
        assert_eq!(names("  b.txt ,a.txt,c.txt  "), ["b.txt", "a.txt", "c.txt"]);
    }

    #[test]
    fn blank_segments_are_dropped() {
        assert!(names(" , , ").is_empty());
        assert!(names("").is_empty());
        assert!(names("   ").is_empty());
        assert_eq!(names(",report.pdf,,\t,"), ["report.pdf"]);
    }

    #[test]
    fn inner_whitespace_is_kept() {
        assert_eq!(names(" my file.docx "), ["my file.docx"]);
    }

    #[test]
    fn empty_fields_pass_through() {
        let fields = FormFields {
            from: String::new(),
            to: String::new(),
            subject: String::new(),
            body: String::new(),
            attachments_csv: String::new(),
        };
        let req = fields.build_request();
        assert_eq!(req.subject, "");
        assert_eq!(req.body, "");
        assert_eq!(req.headers, EmailHeaders::default());
        assert!(req.attachments.is_empty());
    }

    #[test]
    fn sensitive_sample_builds_expected_request() {
        let req = Sample::Sensitive.fields().build_request();
        assert_eq!(req.subject, "Q3 Salary Sheet (Confidential)");
        assert_eq!(req.headers.from, "alice@corp.com");
        assert_eq!(req.headers.to, "finance@demo.local");
        assert!(req.body.contains("confidential salary sheets"));
        assert_eq!(
            req.attachments,
            vec![Attachment {
                filename: "q3_salaries.xlsx".into()
            }]
        );
    }

    #[test]
    fn normal_sample_has_no_attachments() {
        let req = Sample::Normal.fields().build_request();
        assert_eq!(req.headers.from, "bob@partner.com");
        assert!(req.attachments.is_empty());
    }
}
