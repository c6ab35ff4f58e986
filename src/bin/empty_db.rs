use runclub::establish_connection;
use runclub::schema::empty_db;

fn main() {
    let result = establish_connection().and_then(|mut db| Ok(empty_db(&mut db)?));
    if let Err(err) = result {
        eprintln!("Failed to empty DB: {}", err);
        std::process::exit(1);
    }
}
