use enum_map::EnumMap;

use crate::create_statistics_struct;
use crate::operators::OperatorKind;
use crate::statistics::log_statistic_postfix;
use crate::statistics::CumulativeMovingAverage;
use crate::statistics::Statistic;
use crate::statistics::StatisticLogger;

/// Structure responsible for storing the statistics of the [`LocalSearch`].
///
/// [`LocalSearch`]: crate::LocalSearch
#[derive(Debug, Default, Clone)]
pub struct LocalSearchStatistics {
    /// Statistics of the search as a whole.
    pub search: SearchStatistics,
    /// Statistics of the propagation steps, per operator.
    pub operators: OperatorStatistics,
}

create_statistics_struct!(
    /// Statistics of the search as a whole.
    pub SearchStatistics {
        /// The number of moves which were made
        num_moves: u64,
        /// The number of propagation steps, i.e. descents from a node to one of its children
        num_propagations: u64,
        /// The number of nodes which were updated by cone updates, including the updated leaves
        num_updates: u64,
        /// The number of propagation steps which selected an inverse value
        num_propagations_inverse: u64,
        /// The number of propagation steps which selected a consistent value
        num_propagations_consistent: u64,
        /// The number of propagation steps without an invertible or consistent child
        num_conflicts: u64,
        /// The average number of propagation steps per move
        average_path_length: CumulativeMovingAverage<u64>,
        /// The average number of updated nodes per move
        average_cone_size: CumulativeMovingAverage<u64>,
});

/// The number of inverse and consistent values which were selected for the children of each
/// operator.
#[derive(Debug, Default, Clone)]
pub struct OperatorStatistics {
    pub num_inverse: EnumMap<OperatorKind, u64>,
    pub num_consistent: EnumMap<OperatorKind, u64>,
}

impl Statistic for OperatorStatistics {
    fn log(&self, statistic_logger: StatisticLogger) {
        for (kind, count) in self.num_inverse.iter() {
            statistic_logger
                .attach_to_prefix(kind)
                .attach_to_prefix("numInverse")
                .log_statistic(count);
        }
        for (kind, count) in self.num_consistent.iter() {
            statistic_logger
                .attach_to_prefix(kind)
                .attach_to_prefix("numConsistent")
                .log_statistic(count);
        }
    }
}

impl LocalSearchStatistics {
    pub(crate) fn log(&self, statistic_logger: StatisticLogger, verbose: bool) {
        self.search.log(statistic_logger.clone());
        if verbose {
            self.operators
                .log(statistic_logger.attach_to_prefix("operators"));
        }
        log_statistic_postfix();
    }
}

#[cfg(test)]
mod tests {
    use super::LocalSearchStatistics;
    use crate::operators::OperatorKind;
    use crate::statistics::MovingAverage;

    #[test]
    fn operator_counters_are_kept_per_kind() {
        let mut statistics = LocalSearchStatistics::default();
        statistics.operators.num_inverse[OperatorKind::Mul] += 2;
        statistics.operators.num_consistent[OperatorKind::Ult] += 1;
        statistics.search.average_path_length.add_term(3);

        assert_eq!(statistics.operators.num_inverse[OperatorKind::Mul], 2);
        assert_eq!(statistics.operators.num_inverse[OperatorKind::Ult], 0);
        assert_eq!(statistics.operators.num_consistent[OperatorKind::Ult], 1);
        assert!(statistics.search.average_path_length.value() == 3.0);
    }
}
