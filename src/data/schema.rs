//! Record Schema Module
//! Fixed column names of the PRSA station file and the typed observation row.

use chrono::NaiveDateTime;
use std::fmt;
use std::str::FromStr;

/// Integer date-part columns combined into the timestamp.
pub const DATE_COLUMNS: [&str; 4] = ["year", "month", "day", "hour"];

/// Wind direction column.
pub const WIND_DIRECTION_COLUMN: &str = "wd";

/// Station name column (optional).
pub const STATION_COLUMN: &str = "station";

/// Columns whose absence fails the load.
pub const REQUIRED_COLUMNS: [&str; 12] = [
    "year", "month", "day", "hour", "PM2.5", "PM10", "TEMP", "PRES", "DEWP", "RAIN", "WSPM", "wd",
];

const MEASURE_COUNT: usize = 11;

/// Numeric measurement columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Measure {
    Pm25,
    Pm10,
    So2,
    No2,
    Co,
    O3,
    Temp,
    Pres,
    Dewp,
    Rain,
    Wspm,
}

impl Measure {
    pub const ALL: [Measure; MEASURE_COUNT] = [
        Measure::Pm25,
        Measure::Pm10,
        Measure::So2,
        Measure::No2,
        Measure::Co,
        Measure::O3,
        Measure::Temp,
        Measure::Pres,
        Measure::Dewp,
        Measure::Rain,
        Measure::Wspm,
    ];

    /// Column header in the CSV file.
    pub fn column_name(self) -> &'static str {
        match self {
            Measure::Pm25 => "PM2.5",
            Measure::Pm10 => "PM10",
            Measure::So2 => "SO2",
            Measure::No2 => "NO2",
            Measure::Co => "CO",
            Measure::O3 => "O3",
            Measure::Temp => "TEMP",
            Measure::Pres => "PRES",
            Measure::Dewp => "DEWP",
            Measure::Rain => "RAIN",
            Measure::Wspm => "WSPM",
        }
    }

    /// Unit used on chart axes.
    pub fn unit(self) -> &'static str {
        match self {
            Measure::Pm25
            | Measure::Pm10
            | Measure::So2
            | Measure::No2
            | Measure::Co
            | Measure::O3 => "µg/m³",
            Measure::Temp | Measure::Dewp => "°C",
            Measure::Pres => "hPa",
            Measure::Rain => "mm",
            Measure::Wspm => "m/s",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

impl FromStr for Measure {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Measure::ALL
            .into_iter()
            .find(|m| m.column_name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown measurement column '{s}'"))
    }
}

/// Categorical columns usable for grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    WindDirection,
    Station,
}

impl Category {
    pub fn column_name(self) -> &'static str {
        match self {
            Category::WindDirection => WIND_DIRECTION_COLUMN,
            Category::Station => STATION_COLUMN,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Category::WindDirection => "Wind Direction",
            Category::Station => "Station",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "wd" => Ok(Category::WindDirection),
            "station" => Ok(Category::Station),
            other => Err(format!("unknown category column '{other}'")),
        }
    }
}

/// One station-hour.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub timestamp: NaiveDateTime,
    values: [Option<f64>; MEASURE_COUNT],
    pub wind_direction: Option<String>,
    pub station: Option<String>,
}

impl Observation {
    pub fn new(timestamp: NaiveDateTime) -> Self {
        Self {
            timestamp,
            values: [None; MEASURE_COUNT],
            wind_direction: None,
            station: None,
        }
    }

    /// Builder-style setter, mostly for fixtures.
    pub fn with(mut self, measure: Measure, value: f64) -> Self {
        self.set(measure, Some(value));
        self
    }

    pub fn with_wind_direction(mut self, wd: &str) -> Self {
        self.wind_direction = Some(wd.to_string());
        self
    }

    /// Value of a measurement; `None` when missing or NaN.
    pub fn get(&self, measure: Measure) -> Option<f64> {
        self.values[measure.index()].filter(|v| !v.is_nan())
    }

    pub fn set(&mut self, measure: Measure, value: Option<f64>) {
        self.values[measure.index()] = value;
    }

    pub fn category(&self, category: Category) -> Option<&str> {
        match category {
            Category::WindDirection => self.wind_direction.as_deref(),
            Category::Station => self.station.as_deref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2013, 3, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn measure_names_round_trip_through_from_str() {
        for m in Measure::ALL {
            assert_eq!(m.column_name().parse::<Measure>().unwrap(), m);
        }
        assert!("PM1".parse::<Measure>().is_err());
    }

    #[test]
    fn optional_pollutants_are_not_required() {
        assert!(REQUIRED_COLUMNS.contains(&Measure::Pm25.column_name()));
        assert!(REQUIRED_COLUMNS.contains(&Measure::Wspm.column_name()));
        assert!(!REQUIRED_COLUMNS.contains(&Measure::So2.column_name()));
        assert!(!REQUIRED_COLUMNS.contains(&Measure::O3.column_name()));
    }

    #[test]
    fn nan_reads_as_missing() {
        let mut obs = Observation::new(ts()).with(Measure::Temp, 3.5);
        obs.set(Measure::Pm25, Some(f64::NAN));
        assert_eq!(obs.get(Measure::Temp), Some(3.5));
        assert_eq!(obs.get(Measure::Pm25), None);
        assert_eq!(obs.get(Measure::Rain), None);
    }
}
