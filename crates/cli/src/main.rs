//! # CLI
//!
//! A REPL-style command-line interface for the storage engine (§1's
//! out-of-scope "process startup/shutdown glue"). Reads commands from
//! stdin, executes them against an [`engine::Engine`], and prints results
//! to stdout. Designed for interactive use and for scripted testing (pipe
//! commands via stdin).
//!
//! ## Commands
//!
//! ```text
//! SET key value   Insert or update a key-value pair
//! GET key         Look up a key
//! DEL key         Delete a key (writes a tombstone), printing the prior value
//! FLUSH           Force-flush the memtable to an SST
//! EXIT / QUIT     Shut down gracefully
//! ```
//!
//! There is deliberately no `SCAN` here — §1's Non-goals exclude range
//! scans as a public operation. There is also no `COMPACT`: compaction is
//! entirely internal, triggered by the flush path (§4.4 step 6), never by
//! an operator command.
//!
//! ## Configuration
//!
//! Environment variables, documented in full in [`config::EngineConfig`]:
//! `KV_DIR`, `KV_MEM_LIMIT`, `KV_COMPACTING_SIZE`.
use config::EngineConfig;
use engine::{Engine, EngineError};
use std::io::{self, BufRead, Write};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cfg = EngineConfig::from_env();
    let mut engine = Engine::open(cfg.clone())?;

    println!(
        "embedded kv store ready (dir={}, memLimit={}, compactingSize={})",
        cfg.dir.display(),
        cfg.mem_limit,
        cfg.compacting_size
    );
    println!("commands: SET key value | GET key | DEL key | FLUSH | EXIT");
    print!("> ");
    io::stdout().flush().ok();

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let mut parts = line.split_whitespace();
        if let Some(cmd) = parts.next() {
            match cmd.to_uppercase().as_str() {
                "SET" => match parts.next() {
                    Some(key) => {
                        let value: String = parts.collect::<Vec<&str>>().join(" ");
                        if value.is_empty() {
                            println!("ERR usage: SET key value");
                        } else {
                            match engine.set(key.as_bytes().to_vec(), value.into_bytes()) {
                                Ok(()) => println!("OK"),
                                Err(e) => println!("ERR {}", describe(&e)),
                            }
                        }
                    }
                    None => println!("ERR usage: SET key value"),
                },
                "GET" => match parts.next() {
                    Some(key) => match engine.get(key.as_bytes()) {
                        Ok(value) => println!("{}", String::from_utf8_lossy(&value)),
                        Err(e) => println!("ERR {}", describe(&e)),
                    },
                    None => println!("ERR usage: GET key"),
                },
                "DEL" => match parts.next() {
                    Some(key) => match engine.del(key.as_bytes().to_vec()) {
                        Ok(prior) => println!("OK (was {})", String::from_utf8_lossy(&prior)),
                        Err(e) => println!("ERR {}", describe(&e)),
                    },
                    None => println!("ERR usage: DEL key"),
                },
                "FLUSH" => match engine.force_flush() {
                    Ok(()) => println!("OK"),
                    Err(e) => println!("ERR {}", describe(&e)),
                },
                "EXIT" | "QUIT" => {
                    println!("bye");
                    break;
                }
                other => println!("unknown command: {other}"),
            }
        }

        print!("> ");
        io::stdout().flush().ok();
    }

    Ok(())
}

fn describe(err: &EngineError) -> String {
    err.to_string()
}
