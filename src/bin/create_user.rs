use std::env;

use getopts::Options;

use runclub::auth::password;
use runclub::config::Config;
use runclub::create_db_pool;
use runclub::models::NewUser;
use runclub::store::{PgStore, Store};
use runclub::BoxError;

fn print_usage(program: &str, opts: Options) {
    let brief = format!("Usage: {} [options]", program);
    print!("{}", opts.usage(&brief));
}

fn run(new_user: NewUser, plain_password: &str) -> Result<i64, BoxError> {
    let config = Config::load()?;
    let store = PgStore::new(create_db_pool(&config)?);
    let new_user = NewUser {
        password: password::hash(plain_password, config.bcrypt_cost)?,
        ..new_user
    };
    Ok(store.insert_user(&new_user)?.id)
}

fn main() {
    let args: Vec<String> = env::args().collect();
    let program = args[0].clone();

    let mut opts = Options::new();
    opts.optopt("n", "name", "user name", "NAME");
    opts.optopt("e", "email", "user email", "EMAIL");
    opts.optopt("p", "password", "user password", "PASSWORD");
    opts.optopt("", "phone", "phone number", "PHONE");
    opts.optopt("", "gender", "gender", "GENDER");
    opts.optopt("a", "age", "age in years", "AGE");
    opts.optflag("", "planner", "user may plan runs");
    opts.optflag("", "no-runner", "user may not join runs");
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

    let (name, email, plain_password) = match (
        matches.opt_str("n"),
        matches.opt_str("e"),
        matches.opt_str("p"),
    ) {
        (Some(n), Some(e), Some(p)) => (n, e, p),
        _ => {
            print_usage(&program, opts);
            return;
        }
    };
    let age: i32 = match matches.opt_str("a").map(|a| a.parse::<i32>()).transpose() {
        Ok(age) => age.unwrap_or(0),
        Err(err) => {
            eprintln!("Invalid age: {}", err);
            return;
        }
    };

    let new_user = NewUser {
        name,
        email: email.trim().to_lowercase(),
        password: String::new(),
        phone: matches.opt_str("phone").unwrap_or_default(),
        gender: matches.opt_str("gender").unwrap_or_default(),
        age,
        planner: matches.opt_present("planner"),
        runner: !matches.opt_present("no-runner"),
    };

    match run(new_user, &plain_password) {
        Ok(id) => println!("Created user with ID {}", id),
        Err(err) => {
            eprintln!("Failed to create user: {}", err);
            std::process::exit(1);
        }
    }
}
