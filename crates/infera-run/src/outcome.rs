/// Terminal classification of a completed analyzer run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExitClassification {
    Success,
    /// The analyzer ran to completion and reported issues. A legitimate
    /// terminal state, not a crash.
    FindingsPresent,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProcessOutcome {
    pub exit_code: i32,
    pub classification: ExitClassification,
}

impl ProcessOutcome {
    /// Classify a known-good exit code. Returns `None` for codes the caller
    /// must treat as unexpected.
    pub fn classify(exit_code: i32) -> Option<Self> {
        let classification = match exit_code {
            0 => ExitClassification::Success,
            2 => ExitClassification::FindingsPresent,
            _ => return None,
        };
        Some(Self {
            exit_code,
            classification,
        })
    }

    pub fn has_findings(&self) -> bool {
        self.classification == ExitClassification::FindingsPresent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_success() {
        let outcome = ProcessOutcome::classify(0).unwrap();
        assert_eq!(outcome.classification, ExitClassification::Success);
        assert!(!outcome.has_findings());
    }

    #[test]
    fn two_is_findings_present() {
        let outcome = ProcessOutcome::classify(2).unwrap();
        assert_eq!(outcome.classification, ExitClassification::FindingsPresent);
        assert!(outcome.has_findings());
    }

    #[test]
    fn other_codes_are_unclassified() {
        assert!(ProcessOutcome::classify(1).is_none());
        assert!(ProcessOutcome::classify(3).is_none());
        assert!(ProcessOutcome::classify(-1).is_none());
    }
}
