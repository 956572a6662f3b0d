pub mod symbol_analyzer;
