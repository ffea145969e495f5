use jiff::Timestamp;
use meridian_matrix::matrix_request::{DistanceUnit, TimeUnit, TravelMode};

pub fn parse_timestamp(input: &str) -> Result<Timestamp, String> {
    if let Ok(timestamp) = input.parse::<Timestamp>() {
        return Ok(timestamp);
    }

    if let Ok(zoned) = input.parse::<jiff::Zoned>() {
        return Ok(zoned.timestamp());
    }

    Err(format!("Invalid timestamp '{}', expected RFC 3339", input))
}

pub fn parse_travel_mode(input: &str) -> Result<TravelMode, String> {
    match input.to_ascii_lowercase().as_str() {
        "driving" => Ok(TravelMode::Driving),
        "walking" => Ok(TravelMode::Walking),
        "transit" => Ok(TravelMode::Transit),
        _ => Err(String::from("Expected one of driving, walking, transit")),
    }
}

pub fn parse_distance_unit(input: &str) -> Result<DistanceUnit, String> {
    match input.to_ascii_lowercase().as_str() {
        "km" | "kilometer" | "kilometers" => Ok(DistanceUnit::Kilometers),
        "mi" | "mile" | "miles" => Ok(DistanceUnit::Miles),
        _ => Err(String::from("Expected kilometers or miles")),
    }
}

pub fn parse_time_unit(input: &str) -> Result<TimeUnit, String> {
    match input.to_ascii_lowercase().as_str() {
        "s" | "second" | "seconds" => Ok(TimeUnit::Seconds),
        "min" | "minute" | "minutes" => Ok(TimeUnit::Minutes),
        _ => Err(String::from("Expected seconds or minutes")),
    }
}
