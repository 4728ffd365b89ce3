//! Algorithm selection and its parameters.

use std::num::NonZeroU64;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::{fcfs, mlfq, round_robin, sjf, stcf, DispatchPolicy};

/// Which algorithm to run and how it is tuned
///
/// Serialized with the algorithm name in an `"algorithm"` field next to its
/// parameters, e.g. `{"algorithm": "RR", "quantum": 2}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "algorithm", rename_all = "UPPERCASE")]
pub enum AlgorithmConfig {
    Fcfs,
    Sjf,
    Rr {
        #[serde(default)]
        quantum: Option<i64>,
    },
    Stcf,
    Mlfq {
        queues: i64,
        quantums: Vec<i64>,
        #[serde(default)]
        allotment: Option<i64>,
    },
}

impl AlgorithmConfig {
    pub fn name(&self) -> &'static str {
        match self {
            AlgorithmConfig::Fcfs => "FCFS",
            AlgorithmConfig::Sjf => "SJF",
            AlgorithmConfig::Rr { .. } => "RR",
            AlgorithmConfig::Stcf => "STCF",
            AlgorithmConfig::Mlfq { .. } => "MLFQ",
        }
    }

    /// Validates the parameters and builds the matching policy
    pub fn build(&self) -> Result<Box<dyn DispatchPolicy>, ConfigError> {
        let policy: Box<dyn DispatchPolicy> = match self {
            AlgorithmConfig::Fcfs => Box::new(fcfs()),
            AlgorithmConfig::Sjf => Box::new(sjf()),
            AlgorithmConfig::Stcf => Box::new(stcf()),
            AlgorithmConfig::Rr { quantum } => {
                let quantum = quantum.ok_or(ConfigError::MissingQuantum { algorithm: "RR" })?;
                let quantum = positive(quantum).ok_or(ConfigError::NonPositiveQuantum {
                    algorithm: "RR",
                    value: quantum,
                })?;

                Box::new(round_robin(quantum))
            }
            AlgorithmConfig::Mlfq {
                queues,
                quantums,
                allotment,
            } => Box::new(build_mlfq(*queues, quantums, *allotment)?),
        };

        Ok(policy)
    }
}

fn build_mlfq(
    queues: i64,
    quantums: &[i64],
    allotment: Option<i64>,
) -> Result<impl DispatchPolicy, ConfigError> {
    if queues <= 0 {
        return Err(ConfigError::NoQueues(queues));
    }

    if quantums.len() as i64 != queues {
        return Err(ConfigError::QuantumCountMismatch {
            queues,
            quantums: quantums.len(),
        });
    }

    let quantums = quantums
        .iter()
        .enumerate()
        .map(|(queue, &value)| {
            positive(value).ok_or(ConfigError::NonPositiveQueueQuantum { queue, value })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let allotment = allotment.ok_or(ConfigError::MissingAllotment)?;
    let allotment = positive(allotment).ok_or(ConfigError::NonPositiveAllotment(allotment))?;

    mlfq(quantums, allotment)
}

fn positive(value: i64) -> Option<NonZeroU64> {
    u64::try_from(value).ok().and_then(NonZeroU64::new)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::QueueLayout;
    use rstest::rstest;

    fn mlfq(queues: i64, quantums: &[i64], allotment: Option<i64>) -> AlgorithmConfig {
        AlgorithmConfig::Mlfq {
            queues,
            quantums: quantums.to_vec(),
            allotment,
        }
    }

    #[rstest]
    #[case(AlgorithmConfig::Fcfs, "FCFS", QueueLayout::single())]
    #[case(AlgorithmConfig::Sjf, "SJF", QueueLayout::single())]
    #[case(AlgorithmConfig::Rr { quantum: Some(3) }, "RR", QueueLayout::sliced(3))]
    #[case(AlgorithmConfig::Stcf, "STCF", QueueLayout::sliced(1))]
    #[case(mlfq(3, &[2, 4, 8], Some(10)), "MLFQ", QueueLayout::multilevel(&[2, 4, 8], 10))]
    fn builds_every_algorithm(
        #[case] config: AlgorithmConfig,
        #[case] name: &str,
        #[case] layout: QueueLayout,
    ) {
        let policy = config.build().unwrap();

        assert_eq!(policy.name(), name);
        assert_eq!(config.name(), name);
        assert_eq!(policy.initialize_queues(), layout);
    }

    #[rstest]
    #[case(AlgorithmConfig::Rr { quantum: None }, ConfigError::MissingQuantum { algorithm: "RR" })]
    #[case(
        AlgorithmConfig::Rr { quantum: Some(0) },
        ConfigError::NonPositiveQuantum { algorithm: "RR", value: 0 }
    )]
    #[case(mlfq(0, &[], Some(5)), ConfigError::NoQueues(0))]
    #[case(
        mlfq(3, &[2, 4], Some(5)),
        ConfigError::QuantumCountMismatch { queues: 3, quantums: 2 }
    )]
    #[case(
        mlfq(2, &[2, -1], Some(5)),
        ConfigError::NonPositiveQueueQuantum { queue: 1, value: -1 }
    )]
    #[case(mlfq(1, &[2], None), ConfigError::MissingAllotment)]
    #[case(mlfq(1, &[2], Some(0)), ConfigError::NonPositiveAllotment(0))]
    fn rejects_bad_parameters(#[case] config: AlgorithmConfig, #[case] expected: ConfigError) {
        assert_eq!(config.build().unwrap_err(), expected);
    }

    #[test]
    fn deserializes_tagged_algorithm() {
        let config: AlgorithmConfig = serde_json::from_str(
            r#"{ "algorithm": "MLFQ", "queues": 2, "quantums": [1, 2], "allotment": 6 }"#,
        )
        .unwrap();
        assert_eq!(config, mlfq(2, &[1, 2], Some(6)));

        let config: AlgorithmConfig = serde_json::from_str(r#"{ "algorithm": "STCF" }"#).unwrap();
        assert_eq!(config, AlgorithmConfig::Stcf);
    }
}
