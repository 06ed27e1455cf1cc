//! Gridding Kernel Information Tool
//!
//! This binary lists the tuned kernel parameter table and prints the
//! polynomial representation, accuracy and correction factors of individual
//! kernels.
//!
//! Usage:
//!   cargo run --bin kernel_info -- list [--width 8]
//!   cargo run --bin kernel_info -- show 0 [--json] [--samples 2000]
//!   cargo run --bin kernel_info -- find --width 8 --ofactor 2.0

use clap::{Parser, Subcommand};
use gridding_kernel::kernel::PolynomialKernel;
use gridding_kernel::params::{self, KernelParams};
use gridding_kernel::{select_kernel, KERNEL_DB};

/// Type alias for the error type used throughout this module
type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Gridding Kernel Information Tool
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Inspects the ES gridding kernel table and the polynomial kernels built from it",
    long_about = None
)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List table entries
    List {
        /// Only show entries with this support width
        #[arg(short, long)]
        width: Option<usize>,
    },
    /// Build a kernel and print its coefficients and accuracy
    Show {
        /// Table index
        index: usize,

        /// Print the kernel as JSON
        #[arg(long)]
        json: bool,

        /// Number of points used to measure the approximation error
        #[arg(short, long, default_value_t = 1000)]
        samples: usize,
    },
    /// Find the table index for a support width and oversampling factor
    Find {
        #[arg(short, long)]
        width: usize,

        #[arg(short, long)]
        ofactor: f64,
    },
}

/// Prints a section header with a title and separator line
fn print_section_header(title: &str) {
    println!("\n{}:", title);
    println!("-------------------------------------------------------");
}

/// Helper to print named values in a formatted way
fn print_named_value(name: &str, value: impl std::fmt::Display) {
    println!("{}: {}", name, value);
}

fn print_params_row(index: usize, p: &KernelParams) {
    println!(
        "{:5} {:3} {:5.2} {:>12.4e} {:>10.6} {:>10.6} {:>12.4}",
        index, p.w, p.ofactor, p.epsilon, p.beta, p.e0, p.correction_range
    );
}

fn list_entries(width: Option<usize>) -> Result<()> {
    let start = match width {
        Some(w) => params::width_range(w)
            .ok_or_else(|| format!("No kernels with support width {}", w))?
            .start,
        None => 0,
    };
    let rows: &[KernelParams] = match width {
        Some(w) => params::kernels_with_width(w),
        None => KERNEL_DB,
    };

    print_section_header("Kernel Table");
    println!(
        "{:>5} {:>3} {:>5} {:>12} {:>10} {:>10} {:>12}",
        "index", "W", "ofac", "epsilon", "beta", "e0", "corr range"
    );
    for (offset, p) in rows.iter().enumerate() {
        print_params_row(start + offset, p);
    }
    print_named_value("\nEntries", rows.len());
    Ok(())
}

fn print_kernel(index: usize, kernel: &PolynomialKernel, samples: usize) {
    print_section_header(&format!("Kernel {}", index));
    if let Some(p) = kernel.params() {
        print_named_value("Oversampling factor", p.ofactor);
        print_named_value("Tabulated error", format!("{:.4e}", p.epsilon));
        print_named_value("Correction range", p.correction_range);
    }
    print_named_value("Support width", kernel.support());
    print_named_value("Degree", kernel.degree());
    print_named_value("Beta", kernel.shape().beta);
    print_named_value("e0", kernel.shape().e0);
    print_named_value(
        "Max approximation error",
        format!("{:.4e}", kernel.max_error(samples)),
    );

    print_section_header("Coefficients (rows: power, highest first)");
    for (j, row) in kernel.polynomial().coefficients().rows().into_iter().enumerate() {
        let cells: Vec<String> = row.iter().map(|c| format!("{:+.16e}", c)).collect();
        println!("t^{:<2} {}", kernel.degree() - j, cells.join(" "));
    }

    print_section_header("Correction factor");
    for k in 0..=5 {
        let v = 0.1 * k as f64;
        println!("v = {:.1}: {:.10}", v, kernel.corfunc(v));
    }
}

fn main() -> Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args = Args::parse();

    match args.command {
        Command::List { width } => list_entries(width)?,
        Command::Show {
            index,
            json,
            samples,
        } => {
            let kernel = select_kernel(index)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&kernel.summary(samples))?);
            } else {
                print_kernel(index, &kernel, samples);
            }
        }
        Command::Find { width, ofactor } => match params::find_kernel(width, ofactor) {
            Some(index) => {
                print_named_value("Index", index);
                if let Some(p) = params::kernel_params(index) {
                    print_params_row(index, p);
                }
            }
            None => println!("No kernel with W={} and ofactor={}", width, ofactor),
        },
    }

    Ok(())
}
