pub mod delivery_stops;
