pub mod ollama_service;
pub mod open_ai_service;
pub mod stub_service;
