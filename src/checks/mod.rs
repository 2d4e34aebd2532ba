pub mod incomplete;
