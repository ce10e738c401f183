pub mod image_view;
pub mod panels;
