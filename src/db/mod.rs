pub mod prediction_queries;
