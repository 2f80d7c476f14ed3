//! Fixed-width line builders shared by the unit tests.

use std::sync::Arc;

use crate::segment::{classify, Segment};

pub const ORI: &str = "WA1234567";

/// Builds a blank line of an exact length and overlays column values.
pub struct LineBuilder {
    chars: Vec<char>,
}

impl LineBuilder {
    /// Length prefix, segment type and action type `I` are filled in.
    pub fn new(segment_type: char, length: usize) -> Self {
        let mut builder = Self {
            chars: vec![' '; length],
        };
        builder
            .set(1, &format!("{:04}", length))
            .set(5, &segment_type.to_string())
            .set(6, "I")
            .set(17, ORI);
        builder
    }

    /// Overlay `text` starting at 1-based column `start`.
    pub fn set(&mut self, start: usize, text: &str) -> &mut Self {
        for (offset, c) in text.chars().enumerate() {
            if let Some(slot) = self.chars.get_mut(start - 1 + offset) {
                *slot = c;
            }
        }
        self
    }

    pub fn tape(&mut self, month: &str, year: &str) -> &mut Self {
        self.set(7, month).set(9, year)
    }

    pub fn identifier(&mut self, id: &str) -> &mut Self {
        self.set(26, id)
    }

    pub fn build(&self) -> String {
        self.chars.iter().collect()
    }
}

pub fn zero_report() -> String {
    LineBuilder::new('0', 43)
        .tape("02", "2016")
        .set(38, "02")
        .set(40, "2016")
        .build()
}

pub fn administrative(incident: &str) -> String {
    LineBuilder::new('1', 87)
        .tape("02", "2016")
        .identifier(incident)
        .set(38, "20160115")
        .set(46, " ")
        .set(47, "14")
        .set(49, "N")
        .build()
}

pub fn offense(incident: &str) -> String {
    LineBuilder::new('2', 63)
        .identifier(incident)
        .set(38, "13A")
        .set(41, "C")
        .set(42, "N")
        .set(45, "20")
        .set(53, "40")
        .set(62, "88")
        .build()
}

pub fn victim(incident: &str) -> String {
    LineBuilder::new('4', 129)
        .identifier(incident)
        .set(38, "001")
        .set(41, "13A")
        .set(71, "I")
        .set(72, "25  ")
        .set(76, "F")
        .set(77, "W")
        .build()
}

pub fn leoka_victim(incident: &str) -> String {
    LineBuilder::new('4', 141)
        .identifier(incident)
        .set(38, "001")
        .set(41, "13A")
        .set(71, "L")
        .set(130, "01")
        .set(132, "F")
        .build()
}

pub fn offender(incident: &str) -> String {
    LineBuilder::new('5', 45)
        .identifier(incident)
        .set(38, "01")
        .set(40, "30  ")
        .set(44, "M")
        .set(45, "B")
        .build()
}

pub fn arrestee(incident: &str) -> String {
    LineBuilder::new('6', 110)
        .identifier(incident)
        .set(38, "01")
        .set(40, "ARR-0001")
        .set(52, "20160120")
        .set(60, "T")
        .set(61, "N")
        .set(62, "13A")
        .set(65, "12A")
        .set(71, "19  ")
        .set(75, "M")
        .set(76, "W")
        .set(78, "R")
        .build()
}

pub fn group_b_arrest(transaction: &str) -> String {
    LineBuilder::new('7', 66)
        .tape("02", "2016")
        .identifier(transaction)
        .set(38, "01")
        .set(40, "20160203")
        .set(48, "O")
        .set(49, "90D")
        .set(52, "01")
        .set(58, "33  ")
        .set(62, "M")
        .build()
}

pub fn segment(line: &str, line_number: usize) -> Segment {
    classify(line, Arc::from("test.txt"), line_number).unwrap()
}
