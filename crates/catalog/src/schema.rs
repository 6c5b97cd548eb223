//! Catalog table definitions and the statements used to seed them.

pub const FORMATIONS: &str = "formations";
pub const TYPES: &str = "types";
pub const COURSES: &str = "courses";
pub const TRAININGS: &str = "trainings";

pub const CREATE_FORMATIONS: &str = r#"
    CREATE TABLE IF NOT EXISTS formations (
        id INT PRIMARY KEY AUTO_INCREMENT,
        name VARCHAR(100) NOT NULL UNIQUE,
        description TEXT
    )
"#;

pub const CREATE_TYPES: &str = r#"
    CREATE TABLE IF NOT EXISTS types (
        id INT PRIMARY KEY AUTO_INCREMENT,
        name VARCHAR(100) NOT NULL UNIQUE,
        description TEXT
    )
"#;

pub const CREATE_COURSES: &str = r#"
    CREATE TABLE IF NOT EXISTS courses (
        id INT PRIMARY KEY AUTO_INCREMENT,
        name VARCHAR(255) NOT NULL,
        formation_id INT NOT NULL,
        type_id INT NOT NULL,
        FOREIGN KEY (formation_id) REFERENCES formations(id),
        FOREIGN KEY (type_id) REFERENCES types(id),
        UNIQUE KEY unique_course (name, formation_id, type_id)
    )
"#;

pub const CREATE_TRAININGS: &str = r#"
    CREATE TABLE IF NOT EXISTS trainings (
        id INT PRIMARY KEY AUTO_INCREMENT,
        name VARCHAR(255) NOT NULL,
        provider VARCHAR(100) NOT NULL,
        type VARCHAR(50) NOT NULL,
        category VARCHAR(100) NOT NULL,
        UNIQUE KEY unique_training (name, provider)
    )
"#;

/// Tables in creation order. Courses reference formations and types, so
/// those must exist first.
pub const TABLE_CREATION_ORDER: [(&str, &str); 4] = [
    (FORMATIONS, CREATE_FORMATIONS),
    (TYPES, CREATE_TYPES),
    (COURSES, CREATE_COURSES),
    (TRAININGS, CREATE_TRAININGS),
];

pub const INSERT_FORMATION: &str =
    "INSERT IGNORE INTO formations (id, name, description) VALUES (?, ?, ?)";

pub const INSERT_TYPE: &str = "INSERT IGNORE INTO types (id, name, description) VALUES (?, ?, ?)";

pub const INSERT_COURSE: &str =
    "INSERT IGNORE INTO courses (name, formation_id, type_id) VALUES (?, ?, ?)";

pub const INSERT_TRAINING: &str =
    "INSERT IGNORE INTO trainings (name, provider, type, category) VALUES (?, ?, ?, ?)";
