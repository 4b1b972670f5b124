pub mod dto;
pub mod upload_controller;
pub mod upload_service;
