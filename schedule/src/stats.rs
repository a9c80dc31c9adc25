use indexmap::IndexMap;

use crate::Schedule;

/// A breakdown of a schedule by opcode, in order of first appearance.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StepStatistics {
    /// Number of operations of each kind; every member of a batch counts separately.
    pub count_by_kind: IndexMap<&'static str, usize>,
    /// Sum of the operand counts of all operations of each kind.
    pub operands_by_kind: IndexMap<&'static str, usize>,
}

impl StepStatistics {
    pub fn operation_count(&self) -> usize {
        self.count_by_kind.values().sum()
    }
}

pub fn summarize(schedule: &Schedule) -> StepStatistics {
    let mut stats = StepStatistics::default();
    for operation in schedule.operations() {
        *stats.count_by_kind.entry(operation.kind()).or_default() += 1;
        *stats.operands_by_kind.entry(operation.kind()).or_default() += operation.operand_count();
    }
    stats
}

#[cfg(test)]
mod test {
    use crate::{parse_schedule, summarize};

    #[test]
    fn test_summarize() {
        let schedule = parse_schedule(concat!(
            "[",
            r#"["INPUT", [4, 0], "a"],"#,
            r#"["INPUT", [4, 1], "b"],"#,
            "[",
            r#"["HNOR", [[4, 0], [4, 1], [4, 2], [4, 3]], "I38"],"#,
            r#"["HNOR", [[5, 0], [5, 1], [5, 3]], "I39"],"#,
            r#"["NOT", [[6, 8], [6, 0]], "q0"]"#,
            "],",
            r#"["reset", 4, 5, "r"]"#,
            "]",
        ))
        .unwrap();
        let stats = summarize(&schedule);
        assert_eq!(stats.count_by_kind.get("INPUT"), Some(&2));
        assert_eq!(stats.count_by_kind.get("HNOR"), Some(&2));
        assert_eq!(stats.count_by_kind.get("NOT"), Some(&1));
        assert_eq!(stats.count_by_kind.get("reset"), Some(&1));
        assert_eq!(stats.operands_by_kind.get("HNOR"), Some(&5));
        assert_eq!(stats.operands_by_kind.get("NOT"), Some(&1));
        assert_eq!(stats.operands_by_kind.get("reset"), Some(&2));
        assert_eq!(stats.count_by_kind.keys().copied().collect::<Vec<_>>(), vec!["INPUT", "HNOR", "NOT", "reset"]);
        assert_eq!(stats.operation_count(), 6);
    }
}
