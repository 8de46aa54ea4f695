pub mod branches;
pub mod code_editor;
pub mod fields;
pub mod home;
pub mod modal;
pub mod object_form;
pub mod objects;
pub mod permissions;
pub mod select2step;
