pub mod feed_source;
