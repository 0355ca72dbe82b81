pub mod access_codes;
