pub mod standard_replies;
