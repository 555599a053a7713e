pub mod json_path;
