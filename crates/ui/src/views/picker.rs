use std::path::PathBuf;

use rfd::{AsyncFileDialog, AsyncMessageDialog, MessageButtons, MessageDialogResult, MessageLevel};
use site_core::model::ImageUpload;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "gif", "bmp", "heic"];

/// Opens the native file dialog and loads the chosen images.
///
/// Cancelling the dialog yields an empty list. The extension filter is only a
/// hint for the dialog; content is still checked when each file is loaded.
pub async fn pick_images(title: &str) -> Result<Vec<ImageUpload>, String> {
    let Some(handles) = AsyncFileDialog::new()
        .set_title(title)
        .add_filter("Images", IMAGE_EXTENSIONS)
        .pick_files()
        .await
    else {
        return Ok(Vec::new());
    };

    let paths: Vec<PathBuf> = handles
        .iter()
        .map(|handle| handle.path().to_path_buf())
        .collect();
    tracing::debug!(count = paths.len(), "picked images");
    services::load_images(&paths)
        .await
        .map_err(|err| err.to_string())
}

/// Asks a yes/no question with the native message dialog.
pub async fn confirm(title: &str, description: String) -> bool {
    let answer = AsyncMessageDialog::new()
        .set_level(MessageLevel::Warning)
        .set_title(title)
        .set_description(description)
        .set_buttons(MessageButtons::YesNo)
        .show()
        .await;
    answer == MessageDialogResult::Yes
}
