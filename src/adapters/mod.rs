// Adapters layer: concrete implementations of the domain ports (table files, fonts, rendering, image files).

pub mod csv_table;
pub mod font;
pub mod png;
pub mod wordcloud;
