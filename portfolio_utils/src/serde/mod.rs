pub mod nullable_string;
