use std::env;

use chrono::Local;
use getopts::Options;

use runclub::config::Config;
use runclub::create_db_pool;
use runclub::registration::register_for_run;
use runclub::store::PgStore;
use runclub::BoxError;

fn print_usage(program: &str, opts: Options) {
    let brief = format!("Usage: {} [options]", program);
    print!("{}", opts.usage(&brief));
}

fn run(runner_id: i64, run_id: i64) -> Result<String, BoxError> {
    let config = Config::load()?;
    let store = PgStore::new(create_db_pool(&config)?);
    let registered = register_for_run(&store, runner_id, run_id, Local::now().date_naive())?;
    Ok(format!(
        "Created registration with ID {}: {}",
        registered.user_run.id, registered.message
    ))
}

fn main() {
    let args: Vec<String> = env::args().collect();
    let program = args[0].clone();

    let mut opts = Options::new();
    opts.optopt("u", "uid", "runner user id", "UID");
    opts.optopt("r", "rid", "run id", "RID");
    opts.optflag("h", "help", "print this help menu");
    let matches = match opts.parse(&args[1..]) {
        Ok(m) => m,
        Err(f) => {
            eprintln!("{}", f);
            print_usage(&program, opts);
            return;
        }
    };
    if matches.opt_present("h") {
        print_usage(&program, opts);
        return;
    }

    let ids = match (matches.opt_str("u"), matches.opt_str("r")) {
        (Some(uid), Some(rid)) => uid.parse::<i64>().and_then(|u| Ok((u, rid.parse::<i64>()?))),
        _ => {
            print_usage(&program, opts);
            return;
        }
    };
    let (runner_id, run_id) = match ids {
        Ok(ids) => ids,
        Err(err) => {
            eprintln!("Invalid id: {}", err);
            std::process::exit(1);
        }
    };

    match run(runner_id, run_id) {
        Ok(message) => println!("{}", message),
        Err(err) => {
            eprintln!("Failed to register: {}", err);
            std::process::exit(1);
        }
    }
}
