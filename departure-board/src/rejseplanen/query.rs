//! Request parameters for the Rejseplanen endpoints.

use clap::ValueEnum;

/// Which departures a board lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum BoardType {
    /// Departures at the given stop
    #[default]
    #[value(name = "DEP")]
    Dep,
    /// Also departures at equivalent stops
    #[value(name = "DEP_EQUIVS")]
    DepEquivs,
    /// Departures at the stop's mast
    #[value(name = "DEP_MAST")]
    DepMast,
    /// Departures at the whole station
    #[value(name = "DEP_STATION")]
    DepStation,
}

impl BoardType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BoardType::Dep => "DEP",
            BoardType::DepEquivs => "DEP_EQUIVS",
            BoardType::DepMast => "DEP_MAST",
            BoardType::DepStation => "DEP_STATION",
        }
    }
}

/// Kinds of location `location.name` may return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LocationType {
    /// Addresses
    #[value(name = "A")]
    Address,
    /// Everything
    #[value(name = "ALL")]
    All,
    /// Addresses and points of interest
    #[value(name = "AP")]
    AddressPoi,
    /// Points of interest
    #[value(name = "P")]
    Poi,
    /// Stops and stations
    #[default]
    #[value(name = "S")]
    Stop,
    /// Stops and addresses
    #[value(name = "SA")]
    StopAddress,
    /// Stops and points of interest
    #[value(name = "SP")]
    StopPoi,
}

impl LocationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LocationType::Address => "A",
            LocationType::All => "ALL",
            LocationType::AddressPoi => "AP",
            LocationType::Poi => "P",
            LocationType::Stop => "S",
            LocationType::StopAddress => "SA",
            LocationType::StopPoi => "SP",
        }
    }
}

/// A `departureBoard` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardQuery {
    /// Stop id as returned by `location.name`, e.g. "8600626"
    pub stop_id: String,
    pub board_type: BoardType,
    /// Time window in minutes
    pub duration_mins: u32,
    /// Maximum number of departures
    pub max_journeys: Option<u32>,
    /// Response language, e.g. "da" or "en"
    pub lang: String,
}

impl BoardQuery {
    pub fn new(stop_id: impl Into<String>) -> Self {
        Self {
            stop_id: stop_id.into(),
            board_type: BoardType::default(),
            duration_mins: 60,
            max_journeys: None,
            lang: "da".to_string(),
        }
    }

    /// Query parameters, excluding the access id.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("id", self.stop_id.clone()),
            ("format", "json".to_string()),
            ("type", self.board_type.as_str().to_string()),
            ("duration", self.duration_mins.to_string()),
            ("lang", self.lang.clone()),
        ];
        if let Some(max) = self.max_journeys {
            params.push(("maxJourneys", max.to_string()));
        }
        params
    }
}

/// A `location.name` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationQuery {
    /// Free-text search, e.g. "København H"
    pub input: String,
    pub max_results: u32,
    pub lang: String,
    pub location_type: LocationType,
}

impl LocationQuery {
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            max_results: 10,
            lang: "da".to_string(),
            location_type: LocationType::default(),
        }
    }

    /// Query parameters, excluding the access id.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("input", self.input.clone()),
            ("maxNo", self.max_results.to_string()),
            ("format", "json".to_string()),
            ("lang", self.lang.clone()),
            ("type", self.location_type.as_str().to_string()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value<'a>(params: &'a [(&'static str, String)], key: &str) -> Option<&'a str> {
        params
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn board_defaults() {
        let query = BoardQuery::new("8600626");
        let params = query.params();

        assert_eq!(value(&params, "id"), Some("8600626"));
        assert_eq!(value(&params, "format"), Some("json"));
        assert_eq!(value(&params, "type"), Some("DEP"));
        assert_eq!(value(&params, "duration"), Some("60"));
        assert_eq!(value(&params, "lang"), Some("da"));
        assert_eq!(value(&params, "maxJourneys"), None);
    }

    #[test]
    fn board_with_options() {
        let query = BoardQuery {
            board_type: BoardType::DepStation,
            duration_mins: 90,
            max_journeys: Some(20),
            lang: "en".to_string(),
            ..BoardQuery::new("8600626")
        };
        let params = query.params();

        assert_eq!(value(&params, "type"), Some("DEP_STATION"));
        assert_eq!(value(&params, "duration"), Some("90"));
        assert_eq!(value(&params, "maxJourneys"), Some("20"));
        assert_eq!(value(&params, "lang"), Some("en"));
    }

    #[test]
    fn location_params() {
        let query = LocationQuery::new("København H");
        let params = query.params();

        assert_eq!(value(&params, "input"), Some("København H"));
        assert_eq!(value(&params, "maxNo"), Some("10"));
        assert_eq!(value(&params, "type"), Some("S"));
    }

    #[test]
    fn value_enum_names_match_api() {
        for board_type in BoardType::value_variants() {
            let name = board_type.to_possible_value().unwrap();
            assert_eq!(name.get_name(), board_type.as_str());
        }
        for location_type in LocationType::value_variants() {
            let name = location_type.to_possible_value().unwrap();
            assert_eq!(name.get_name(), location_type.as_str());
        }
    }
}
