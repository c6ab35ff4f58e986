use std::env;

use chrono::{NaiveDate, NaiveTime};
use getopts::Options;

use runclub::config::Config;
use runclub::create_db_pool;
use runclub::models::NewRun;
use runclub::store::{PgStore, Store};
use runclub::BoxError;

fn print_usage(program: &str, opts: Options) {
    let brief = format!("Usage: {} [options]", program);
    print!("{}", opts.usage(&brief));
}

fn parse_point(value: &str) -> Result<(f64, f64), BoxError> {
    let mut parts = value.splitn(2, ',');
    match (parts.next(), parts.next()) {
        (Some(lat), Some(lon)) => Ok((lat.trim().parse()?, lon.trim().parse()?)),
        _ => Err(format!("expected LAT,LON but got {}", value).into()),
    }
}

fn build_run(matches: &getopts::Matches) -> Result<Option<NewRun>, BoxError> {
    let required = ["n", "p", "d", "t", "l", "s", "k"];
    if required.iter().any(|opt| !matches.opt_present(opt)) {
        return Ok(None);
    }
    let get = |opt: &str| matches.opt_str(opt).unwrap_or_default();

    let location = get("l");
    let (latitude, longitude) = parse_point(&get("s"))?;
    let location_to = matches.opt_str("L").unwrap_or_else(|| location.clone());
    let (latitude_to, longitude_to) = match matches.opt_str("e") {
        Some(end) => parse_point(&end)?,
        None => (latitude, longitude),
    };

    Ok(Some(NewRun {
        name: get("n"),
        description: get("D"),
        location,
        latitude,
        longitude,
        location_to,
        latitude_to,
        longitude_to,
        distance: get("k").parse()?,
        date: NaiveDate::parse_from_str(&get("d"), "%Y-%m-%d")?,
        time: NaiveTime::parse_from_str(&get("t"), "%H:%M")?,
        planner_id: get("p").parse()?,
    }))
}

fn run(new_run: NewRun) -> Result<i64, BoxError> {
    let config = Config::load()?;
    let store = PgStore::new(create_db_pool(&config)?);
    match store.find_user(new_run.planner_id)? {
        Some(user) if user.planner => Ok(store.insert_run(&new_run)?.id),
        Some(_) => Err(format!("user {} is not a planner", new_run.planner_id).into()),
        None => Err(format!("no user with ID {}", new_run.planner_id).into()),
    }
}

fn main() {
    let args: Vec<String> = env::args().collect();
    let program = args[0].clone();

    let mut opts = Options::new();
    opts.optopt("n", "name", "run name", "NAME");
    opts.optopt("D", "description", "run description", "TEXT");
    opts.optopt("p", "planner", "planner user id", "UID");
    opts.optopt("d", "date", "run date", "YYYY-MM-DD");
    opts.optopt("t", "time", "start time", "HH:MM");
    opts.optopt("l", "location", "start location name", "PLACE");
    opts.optopt("s", "start", "start coordinates", "LAT,LON");
    opts.optopt("L", "location-to", "end location name, defaults to start", "PLACE");
    opts.optopt("e", "end", "end coordinates, defaults to start", "LAT,LON");
    opts.optopt("k", "distance", "distance in kilometres", "KM");
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

    let new_run = match build_run(&matches) {
        Ok(Some(new_run)) => new_run,
        Ok(None) => {
            print_usage(&program, opts);
            return;
        }
        Err(err) => {
            eprintln!("Invalid argument: {}", err);
            std::process::exit(1);
        }
    };

    match run(new_run) {
        Ok(id) => println!("Created run with ID {}", id),
        Err(err) => {
            eprintln!("Failed to create run: {}", err);
            std::process::exit(1);
        }
    }
}
