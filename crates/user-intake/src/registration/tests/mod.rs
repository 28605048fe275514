mod common;
mod credit;
