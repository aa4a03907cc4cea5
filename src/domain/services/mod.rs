mod hop_extractor;

pub use hop_extractor::HopExtractor;
