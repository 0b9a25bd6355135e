pub mod job_application;
