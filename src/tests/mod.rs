pub mod mocks;

mod section_extractor_tests;
mod sample_synthesizer_tests;
mod repair_tests;
