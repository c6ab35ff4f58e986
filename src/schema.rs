use postgres::Client;

const CREATE_TABLES: &str = "
CREATE TABLE IF NOT EXISTS users (
    id BIGSERIAL PRIMARY KEY,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    name TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE,
    password TEXT NOT NULL,
    phone TEXT NOT NULL DEFAULT '',
    gender TEXT NOT NULL DEFAULT '',
    age INTEGER NOT NULL DEFAULT 0,
    planner BOOLEAN NOT NULL DEFAULT FALSE,
    runner BOOLEAN NOT NULL DEFAULT TRUE
);

CREATE TABLE IF NOT EXISTS runs (
    id BIGSERIAL PRIMARY KEY,
    name TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    location TEXT NOT NULL,
    latitude DOUBLE PRECISION NOT NULL,
    longitude DOUBLE PRECISION NOT NULL,
    location_to TEXT NOT NULL,
    latitude_to DOUBLE PRECISION NOT NULL,
    longitude_to DOUBLE PRECISION NOT NULL,
    distance DOUBLE PRECISION NOT NULL,
    date DATE NOT NULL,
    time TIME NOT NULL,
    planner_id BIGINT NOT NULL REFERENCES users (id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS users_runs (
    id BIGSERIAL PRIMARY KEY,
    runner_id BIGINT NOT NULL REFERENCES users (id) ON DELETE CASCADE,
    run_id BIGINT NOT NULL REFERENCES runs (id) ON DELETE CASCADE,
    time INTEGER NOT NULL DEFAULT 0,
    rating INTEGER NOT NULL DEFAULT 0,
    UNIQUE (runner_id, run_id)
);

CREATE INDEX IF NOT EXISTS runs_planner_id_idx ON runs (planner_id);
";

const DROP_TABLES: &str = "
DROP TABLE IF EXISTS users_runs;
DROP TABLE IF EXISTS runs;
DROP TABLE IF EXISTS users;
";

pub fn create_db(db: &mut Client) -> Result<(), postgres::Error> {
    db.batch_execute(CREATE_TABLES)
}

pub fn empty_db(db: &mut Client) -> Result<(), postgres::Error> {
    db.batch_execute(DROP_TABLES)
}
