use crate::{
    domain::{Club, Competition},
    ports::storage::{Error, StoragePort},
};
use chrono::{NaiveDateTime, TimeZone, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

/// Format of competition dates on disk
///
/// Dates carry no offset and are read as UTC.
const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Clubs and competitions stored as two JSON files
///
/// Numbers are stored as strings, e.g. `{"points": "13"}`. They are parsed once when loading.
#[derive(Clone, Debug)]
pub struct JsonFileStorage {
    clubs_path: PathBuf,
    competitions_path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(clubs_path: impl Into<PathBuf>, competitions_path: impl Into<PathBuf>) -> Self {
        Self {
            clubs_path: clubs_path.into(),
            competitions_path: competitions_path.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct ClubsFile {
    clubs: Vec<ClubRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ClubRecord {
    name: String,
    email: String,
    points: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct CompetitionsFile {
    competitions: Vec<CompetitionRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CompetitionRecord {
    name: String,
    date: String,
    number_of_places: String,
}

impl TryFrom<ClubRecord> for Club {
    type Error = Error;

    fn try_from(record: ClubRecord) -> Result<Self, Self::Error> {
        let points = parse_count(&record.name, "points", &record.points)?;
        Ok(Club::new(record.name, record.email, points))
    }
}

impl From<&Club> for ClubRecord {
    fn from(club: &Club) -> Self {
        Self {
            name: club.name.clone(),
            email: club.email.clone(),
            points: club.points.to_string(),
        }
    }
}

impl TryFrom<CompetitionRecord> for Competition {
    type Error = Error;

    fn try_from(record: CompetitionRecord) -> Result<Self, Self::Error> {
        let date = NaiveDateTime::parse_from_str(&record.date, DATE_FORMAT).map_err(|_| {
            Error::InvalidField {
                entity: record.name.clone(),
                field: "date",
                value: record.date.clone(),
            }
        })?;
        let number_of_places =
            parse_count(&record.name, "numberOfPlaces", &record.number_of_places)?;

        Ok(Competition::new(
            record.name,
            Utc.from_utc_datetime(&date),
            number_of_places,
        ))
    }
}

impl From<&Competition> for CompetitionRecord {
    fn from(competition: &Competition) -> Self {
        Self {
            name: competition.name.clone(),
            date: competition.date.format(DATE_FORMAT).to_string(),
            number_of_places: competition.number_of_places.to_string(),
        }
    }
}

fn parse_count(entity: &str, field: &'static str, value: &str) -> Result<u32, Error> {
    value.trim().parse().map_err(|_| Error::InvalidField {
        entity: entity.to_string(),
        field,
        value: value.to_string(),
    })
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, Error> {
    let file = File::open(path).map_err(|err| Error::Adapter(Box::new(err)))?;
    serde_json::from_reader(BufReader::new(file)).map_err(|err| Error::Adapter(Box::new(err)))
}

/// Write `value` with 4-space indentation
fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), Error> {
    let file = File::create(path).map_err(|err| Error::Adapter(Box::new(err)))?;
    let mut writer = BufWriter::new(file);
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut writer, formatter);
    value
        .serialize(&mut serializer)
        .map_err(|err| Error::Adapter(Box::new(err)))?;
    writer.flush().map_err(|err| Error::Adapter(Box::new(err)))
}

impl StoragePort for JsonFileStorage {
    fn load_clubs(&self) -> Result<Vec<Club>, Error> {
        let file: ClubsFile = read_json(&self.clubs_path)?;
        file.clubs.into_iter().map(Club::try_from).collect()
    }

    fn load_competitions(&self) -> Result<Vec<Competition>, Error> {
        let file: CompetitionsFile = read_json(&self.competitions_path)?;
        file.competitions
            .into_iter()
            .map(Competition::try_from)
            .collect()
    }

    fn save_clubs(&self, clubs: &[Club]) -> Result<(), Error> {
        tracing::debug!(path = %self.clubs_path.display(), "saving clubs");
        write_json(
            &self.clubs_path,
            &ClubsFile {
                clubs: clubs.iter().map(ClubRecord::from).collect(),
            },
        )
    }

    fn save_competitions(&self, competitions: &[Competition]) -> Result<(), Error> {
        tracing::debug!(path = %self.competitions_path.display(), "saving competitions");
        write_json(
            &self.competitions_path,
            &CompetitionsFile {
                competitions: competitions.iter().map(CompetitionRecord::from).collect(),
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use speculoos::prelude::*;
    use std::fs;
    use uuid::Uuid;

    const CLUBS: &str = r#"{
    "clubs": [
        {"name": "Simply Lift", "email": "john@simplylift.co", "points": "13"},
        {"name": "Iron Temple", "email": "admin@irontemple.com", "points": "4"},
        {"name": "She Lifts", "email": "kate@shelifts.co.uk", "points": "12"}
    ]
}"#;

    const COMPETITIONS: &str = r#"{
    "competitions": [
        {"name": "Spring Festival", "date": "2020-03-27 10:00:00", "numberOfPlaces": "25"},
        {"name": "Fall Classic", "date": "2030-10-22 13:30:00", "numberOfPlaces": "13"}
    ]
}"#;

    /// Storage backed by fresh files in the temporary directory
    struct TestFiles {
        storage: JsonFileStorage,
    }

    impl TestFiles {
        fn new(clubs: &str, competitions: &str) -> Self {
            let dir = std::env::temp_dir();
            let id = Uuid::new_v4();
            let clubs_path = dir.join(format!("clubs-{id}.json"));
            let competitions_path = dir.join(format!("competitions-{id}.json"));
            fs::write(&clubs_path, clubs).unwrap();
            fs::write(&competitions_path, competitions).unwrap();
            Self {
                storage: JsonFileStorage::new(clubs_path, competitions_path),
            }
        }
    }

    impl Drop for TestFiles {
        fn drop(&mut self) {
            let _ = fs::remove_file(&self.storage.clubs_path);
            let _ = fs::remove_file(&self.storage.competitions_path);
        }
    }

    #[test]
    fn test_load() {
        let files = TestFiles::new(CLUBS, COMPETITIONS);

        let clubs = files.storage.load_clubs();
        assert_that!(clubs).is_ok().is_equal_to(vec![
            Club::new("Simply Lift", "john@simplylift.co", 13),
            Club::new("Iron Temple", "admin@irontemple.com", 4),
            Club::new("She Lifts", "kate@shelifts.co.uk", 12),
        ]);

        let competitions = files.storage.load_competitions();
        assert_that!(competitions).is_ok().is_equal_to(vec![
            Competition::new(
                "Spring Festival",
                Utc.with_ymd_and_hms(2020, 3, 27, 10, 0, 0).unwrap(),
                25,
            ),
            Competition::new(
                "Fall Classic",
                Utc.with_ymd_and_hms(2030, 10, 22, 13, 30, 0).unwrap(),
                13,
            ),
        ]);
    }

    #[test]
    fn test_save_then_load() {
        let files = TestFiles::new(CLUBS, COMPETITIONS);
        let mut clubs = files.storage.load_clubs().unwrap();
        let mut competitions = files.storage.load_competitions().unwrap();
        clubs[1].points = 1;
        competitions[1].number_of_places = 10;

        assert_that!(files.storage.save_clubs(&clubs)).is_ok();
        assert_that!(files.storage.save_competitions(&competitions)).is_ok();

        assert_that!(files.storage.load_clubs())
            .is_ok()
            .is_equal_to(clubs);
        assert_that!(files.storage.load_competitions())
            .is_ok()
            .is_equal_to(competitions);

        // Numbers stay strings on disk
        let raw = fs::read_to_string(&files.storage.clubs_path).unwrap();
        assert_that!(raw).contains(r#""points": "1""#);
        let raw = fs::read_to_string(&files.storage.competitions_path).unwrap();
        assert_that!(raw).contains(r#""numberOfPlaces": "10""#);
        assert_that!(raw).contains(r#""date": "2030-10-22 13:30:00""#);
    }

    #[test]
    fn test_load_invalid_points() {
        let files = TestFiles::new(
            r#"{"clubs": [{"name": "Simply Lift", "email": "john@simplylift.co", "points": "-3"}]}"#,
            COMPETITIONS,
        );

        let res = files.storage.load_clubs();

        assert_that!(res).is_err().matches(|err| {
            matches!(err, Error::InvalidField { field: "points", value, .. } if value == "-3")
        });
    }

    #[test]
    fn test_load_invalid_date() {
        let files = TestFiles::new(
            CLUBS,
            r#"{"competitions": [{"name": "Fall Classic", "date": "22/10/2030", "numberOfPlaces": "13"}]}"#,
        );

        let res = files.storage.load_competitions();

        assert_that!(res)
            .is_err()
            .matches(|err| matches!(err, Error::InvalidField { field: "date", .. }));
    }

    #[test]
    fn test_load_missing_file() {
        let storage = JsonFileStorage::new(
            std::env::temp_dir().join(format!("missing-{}.json", Uuid::new_v4())),
            std::env::temp_dir().join(format!("missing-{}.json", Uuid::new_v4())),
        );

        assert_that!(storage.load_clubs())
            .is_err()
            .matches(|err| matches!(err, Error::Adapter(_)));
    }
}
