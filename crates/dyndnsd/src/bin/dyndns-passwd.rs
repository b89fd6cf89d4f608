// # dyndns-passwd
//
// Reads a password from the first line of stdin and prints its argon2 PHC
// hash, ready to paste into the `password` field of a domain entry.
//
// ```bash
// dyndns-passwd <<< 'correct horse battery staple'
// ```

use anyhow::{Context, Result};
use std::io::{self, BufRead};
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(hash) => {
            println!("{hash}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("dyndns-passwd: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<String> {
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("cannot read password from stdin")?;

    let password = line.trim_end_matches(['\r', '\n']);
    if password.is_empty() {
        anyhow::bail!("empty password");
    }

    Ok(dyndns_core::hash_password(password)?)
}
