pub mod late_fee;
pub mod reassessment;
pub mod status;
