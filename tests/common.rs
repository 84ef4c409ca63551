#![cfg(feature = "std")]

use std::path::Path;

use codec8e::{
    GpsFix,
    avec::{FromRecord, FromRecords},
};
use csv::ReaderBuilder;

#[test]
fn decode_slice_teltonika_example() {
    const PATH: &str = "fixtures/teltonika-example.bin";
    let data = std::fs::read(PATH).unwrap();
    let mut validator = Validator::new(PATH);
    codec8e::avec::decode_slice(&data, &mut validator).unwrap();
    validator.finish();
}

#[test]
fn decode_slice_two_records() {
    const PATH: &str = "fixtures/two-records.bin";
    let data = std::fs::read(PATH).unwrap();
    let mut validator = Validator::new(PATH);
    codec8e::avec::decode_slice(&data, &mut validator).unwrap();
    validator.finish();
}

#[test]
fn decode_reader_teltonika_example() {
    const PATH: &str = "fixtures/teltonika-example.bin";
    let mut file = std::fs::File::open(PATH).unwrap();
    let mut validator = Validator::new(PATH);
    codec8e::avec::decode_reader(&mut file, &mut validator).unwrap();
    validator.finish();
}

#[test]
fn decode_reader_two_records() {
    const PATH: &str = "fixtures/two-records.bin";
    let mut file = std::fs::File::open(PATH).unwrap();
    let mut validator = Validator::new(PATH);
    codec8e::avec::decode_reader(&mut file, &mut validator).unwrap();
    validator.finish();
}

#[test]
fn decode_reader_consumes_one_packet() {
    let mut data = std::fs::read("fixtures/teltonika-example.bin").unwrap();
    data.extend(std::fs::read("fixtures/two-records.bin").unwrap());

    let mut r = std::io::Cursor::new(data);
    let first = codec8e::avec::reader::decode_packet(&mut r).unwrap();
    let second = codec8e::avec::reader::decode_packet(&mut r).unwrap();

    assert_eq!(first.records.len(), 1);
    assert_eq!(second.records.len(), 2);
    assert_eq!(r.position() as usize, r.get_ref().len());
}

/// Checks published values against the rows of a CSV file, one row per
/// record: timestamp, priority, longitude, latitude, altitude, angle,
/// satellites, speed, event identifier and element count, followed by
/// identifier and value pairs.
struct Validator(Vec<String>, Vec<Vec<String>>);

impl Validator {
    fn new(path: impl AsRef<Path>) -> Self {
        let _ = env_logger::builder().is_test(true).try_init();

        let path = path.as_ref().with_extension("csv");

        let mut reader = ReaderBuilder::new()
            .flexible(true)
            .has_headers(false)
            .from_path(path)
            .unwrap();

        let expected: Vec<Vec<String>> = reader
            .records()
            .map(|r| r.unwrap().iter().map(|f| f.to_string()).collect())
            .collect();

        Self(vec![], expected)
    }

    fn next(&mut self) -> String {
        self.0.remove(0)
    }

    fn finish(&self) {
        assert!(self.0.is_empty(), "unpublished values: {:?}", self.0);
        assert!(self.1.is_empty(), "unpublished records: {:?}", self.1);
    }
}

impl FromRecords for Validator {
    fn add_record(&mut self) -> Option<&mut dyn FromRecord> {
        assert!(self.0.is_empty(), "unpublished values: {:?}", self.0);
        self.0 = self.1.remove(0);
        Some(self)
    }
}

impl FromRecord for Validator {
    fn add_timestamp(&mut self, timestamp: i64) {
        assert_eq!(self.next(), timestamp.to_string());
    }
    fn add_priority(&mut self, priority: u8) {
        assert_eq!(self.next(), priority.to_string());
    }
    fn add_gps(&mut self, gps: &GpsFix) {
        assert_eq!(self.next().parse::<f64>().unwrap(), gps.longitude);
        assert_eq!(self.next().parse::<f64>().unwrap(), gps.latitude);
        assert_eq!(self.next(), gps.altitude.to_string());
        assert_eq!(self.next(), gps.angle.to_string());
        assert_eq!(self.next(), gps.satellites.to_string());
        assert_eq!(self.next(), gps.speed.to_string());
    }
    fn add_event(&mut self, event_id: u16, io_count: u16) {
        assert_eq!(self.next(), event_id.to_string());
        assert_eq!(self.next(), io_count.to_string());
    }
    fn add_element(&mut self, id: u16, value: u64) {
        assert_eq!(self.next(), id.to_string());
        assert_eq!(self.next(), value.to_string());
    }
}
