// Copyright 2025 dentsusoken
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use clap::{Parser, Subcommand};
use ftpcheck::commands::check::{CheckArgs, CheckCommand};
use ftpcheck::commands::suite::SuiteCommand;
use ftpcheck::error::{Result, format_error_with_color, get_exit_code};
use ftpcheck::logging;
use std::io::IsTerminal;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ftpcheck")]
#[command(author, version, about = "Verify files served by FTP servers", long_about = None)]
struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download one file and compare it against criteria
    #[command(long_about = "Download one file and compare it against criteria

Criteria are semicolon separated key=value pairs. Known keys are exists,
substring_match, regex_match, match, sha256, md5 and sha1.

Examples:
  ftpcheck check ftp.example.com /pub/readme.txt --criteria 'match=hello world'
  ftpcheck check ftp.example.com:2121 /pub/hello.txt --criteria exists --criteria sha256=2cf2...")]
    Check {
        /// FTP server, as host or host:port (port 21 when omitted)
        target: String,

        /// Path of the file on the server
        path: String,

        /// Login name (anonymous when empty)
        #[arg(short, long, default_value = "")]
        username: String,

        /// Login password
        #[arg(short, long, default_value = "")]
        password: String,

        /// Criteria to apply, may be repeated
        #[arg(short, long, value_name = "KEY=VALUE;...")]
        criteria: Vec<String>,

        /// Time budget in seconds, or "infinite"
        #[arg(short, long, value_name = "SECONDS")]
        timeout: Option<String>,

        /// Output the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run every check listed in a TOML suite file
    Suite {
        /// Suite file to run
        file: PathBuf,

        /// Override every check's time budget (seconds or "infinite")
        #[arg(short, long, value_name = "SECONDS")]
        timeout: Option<String>,

        /// Output the report as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    logging::setup_logger(cli.verbose);

    let result: Result<i32> = (|| match cli.command {
        Commands::Check {
            target,
            path,
            username,
            password,
            criteria,
            timeout,
            json,
        } => {
            CheckCommand::new().execute(&CheckArgs {
                target,
                path,
                username,
                password,
                criteria,
                timeout,
                json,
            })
        }
        Commands::Suite {
            file,
            timeout,
            json,
        } => {
            let command = SuiteCommand::new(&file)?;
            command.execute(json, cli.verbose > 0, timeout.as_deref())
        }
    })();

    match result {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!(
                "{}",
                format_error_with_color(&e, std::io::stderr().is_terminal())
            );
            std::process::exit(get_exit_code(&e));
        }
    }
}
