//! This file provides some common functions
//! such as vector updates and the stats printer.
use colored::Colorize;

use crate::constants::{FULL_WIDTH, STAT_WIDTH};


/// Computes `y += alpha * x`.
#[inline(always)]
pub(crate) fn axpy(alpha: f64, x: &[f64], y: &mut [f64]) {
    assert_eq!(x.len(), y.len());
    y.iter_mut()
        .zip(x)
        .for_each(|(yi, xi)| { *yi += alpha * xi; });
}


/// Computes `x *= alpha`.
#[inline(always)]
pub(crate) fn scale(alpha: f64, x: &mut [f64]) {
    x.iter_mut()
        .for_each(|xi| { *xi *= alpha; });
}


/// Compute the inner-product of the given two slices.
#[inline(always)]
pub(crate) fn inner_product(v1: &[f64], v2: &[f64]) -> f64 {
    v1.iter()
        .zip(v2)
        .map(|(a, b)| a * b)
        .sum::<f64>()
}


/// Prints a summary table of a component.
pub(crate) fn print_stats(kind: &str, name: &str, info: &[(String, String)]) {
    let header = format!(
        "{:=>FULL_WIDTH$}\n{:^FULL_WIDTH$}\n{:->FULL_WIDTH$}",
        "", "STATS".bold(), "",
    );
    println!(
        "\n{header}\n\
        + {:<STAT_WIDTH$}\t{:>STAT_WIDTH$}",
        kind.bold(),
        name.bold().green(),
    );

    let line = info.iter()
        .map(|(key, val)| {
            format!(
                "    + {:<STAT_WIDTH$}\t{:>width$}",
                key,
                val.bold().yellow(),
                width = STAT_WIDTH - 8
            )
        })
        .collect::<Vec<_>>()
        .join("\n");
    if !line.is_empty() {
        println!("{line}");
    }
    println!("{:=^FULL_WIDTH$}\n", "".bold());
}
