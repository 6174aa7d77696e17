mod format;
mod generator;
mod parser;
mod reconcile;
