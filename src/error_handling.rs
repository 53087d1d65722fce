use std::fmt::Display;
use std::path::PathBuf;

pub trait ErrorType: Display + PartialEq {}

// The part of a system description an error refers to
#[derive(Debug, PartialEq, Clone)]
pub enum Entry {
    System,
    Production(String),
    Axiom(usize),
}

#[derive(Debug, PartialEq, Clone)]
pub struct Location {
    pub file: PathBuf,
    pub entry: Entry,
}

impl Location {
    pub fn new(file: PathBuf, entry: Entry) -> Self {
        Location { file, entry }
    }

    pub fn production(file: PathBuf, lhs: &str) -> Self {
        Location::new(file, Entry::Production(lhs.to_string()))
    }
}

impl Display for Entry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Entry::System => write!(f, "system"),
            Entry::Production(lhs) => write!(f, "production `{}`", lhs),
            Entry::Axiom(index) => write!(f, "axiom entry {}", index),
        }
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.file.as_os_str().is_empty() {
            write!(f, "{}", self.entry)
        } else {
            write!(f, "{}: {}", self.file.display(), self.entry)
        }
    }
}

#[derive(Debug, PartialEq)]
pub struct Error<T: ErrorType> {
    pub location: Location,
    pub error: T,
}

impl<T: ErrorType> Display for Error<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "\x1b[31;49;1m[{}]\x1b[39;49;1m  {}\x1b[0m", self.location, self.error)
    }
}

pub type Errors<T> = Vec<Error<T>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_display() {
        let in_file = Location::production(PathBuf::from("plant.json"), "F(s)");
        assert_eq!(in_file.to_string(), "plant.json: production `F(s)`");

        let no_file = Location::new(PathBuf::new(), Entry::Axiom(2));
        assert_eq!(no_file.to_string(), "axiom entry 2");
    }
}
