use std::process;

use log::{debug, error};

use crate::{
    bits::parse_hex,
    error::{Error, Result},
    eval::{evaluate, sum_versions},
    packet::{decode_transmission, Packet},
};

mod bits;
mod error;
mod eval;
mod packet;

#[cfg(test)]
mod testing;

const INPUT: &str = include_str!("../input.txt");

fn main() {
    env_logger::init();

    if let Err(err) = run(INPUT) {
        error!("{}", err);
        process::exit(1);
    }
}

fn run(content: &str) -> Result<()> {
    let packets = read_transmission(content)?;

    println!("Part 1 solution: {}", solve_part1(&packets));
    println!("Part 2 solution: {}", solve_part2(&packets)?);

    Ok(())
}

fn read_transmission(content: &str) -> Result<Vec<Packet>> {
    let bits = parse_hex(content)?;
    debug!("transmission is {} bits", bits.len());

    Ok(decode_transmission(&bits)?)
}

fn solve_part1(packets: &[Packet]) -> u64 {
    packets.iter().map(sum_versions).sum()
}

fn solve_part2(packets: &[Packet]) -> Result<u64> {
    let packet = packets.first().ok_or(Error::EmptyTransmission)?;

    Ok(evaluate(packet)?)
}
