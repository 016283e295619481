/// Visibility of the placeholder dialog behind the "Add" button.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ModalToggle {
    visible: bool,
}

impl ModalToggle {
    pub fn is_visible(self) -> bool {
        self.visible
    }

    /// The floating "Add" control.
    pub fn open(&mut self) {
        self.visible = true;
    }

    /// The "Hide Modal" control inside the dialog.
    pub fn hide(&mut self) {
        self.visible = false;
    }

    /// The dialog asking to be closed (Esc).
    pub fn request_close(&mut self) {
        self.visible = false;
    }
}
