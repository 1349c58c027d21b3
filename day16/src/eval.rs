use itertools::{process_results, Itertools};

use crate::{
    error::EvalError,
    packet::{Operator, Packet, PacketData},
};

pub fn sum_versions(packet: &Packet) -> u64 {
    packet.iter().map(|p| u64::from(p.version())).sum()
}

pub fn evaluate(packet: &Packet) -> Result<u64, EvalError> {
    let (operator, children) = match packet.data() {
        PacketData::Literal(value) => return Ok(*value),
        PacketData::Operator { operator, children } => (*operator, children),
    };
    let arity_mismatch = EvalError::ArityMismatch {
        operator,
        actual: children.len(),
    };

    match operator {
        Operator::Sum => process_results(children.iter().map(evaluate), |values| {
            values.fold(Some(0u64), |acc, value| acc?.checked_add(value))
        })?
        .ok_or(EvalError::Overflow { operator }),
        Operator::Product => process_results(children.iter().map(evaluate), |values| {
            values.fold(Some(1u64), |acc, value| acc?.checked_mul(value))
        })?
        .ok_or(EvalError::Overflow { operator }),
        Operator::Minimum => {
            process_results(children.iter().map(evaluate), |values| values.min())?
                .ok_or(arity_mismatch)
        }
        Operator::Maximum => {
            process_results(children.iter().map(evaluate), |values| values.max())?
                .ok_or(arity_mismatch)
        }
        Operator::GreaterThan | Operator::LessThan | Operator::EqualTo => {
            let (left, right) = children.iter().collect_tuple().ok_or(arity_mismatch)?;
            let (left, right) = (evaluate(left)?, evaluate(right)?);

            let holds = match operator {
                Operator::GreaterThan => left > right,
                Operator::LessThan => left < right,
                _ => left == right,
            };
            Ok(holds.into())
        }
    }
}
