//! CourseService: authorization and error translation over a `CourseStore`.

mod course;
pub use course::CourseService;
