use runclub::establish_connection;
use runclub::schema::create_db;

fn main() {
    let mut db = match establish_connection() {
        Ok(db) => db,
        Err(err) => {
            eprintln!("Failed to connect: {}", err);
            std::process::exit(1);
        }
    };

    match create_db(&mut db) {
        Ok(_) => println!("Created tables users, runs and users_runs"),
        Err(err) => {
            eprintln!("Failed to create DB: {}", err);
            std::process::exit(1);
        }
    }
}
