//! Win32 console calls behind [`ConsoleApi`].

use std::io::{self, Write};

use windows_sys::Win32::Foundation::{HANDLE, INVALID_HANDLE_VALUE};
use windows_sys::Win32::System::Console::{
    GetConsoleScreenBufferInfo, GetStdHandle, SetConsoleCursorPosition, SetConsoleTextAttribute,
    SetConsoleTitleW, CONSOLE_SCREEN_BUFFER_INFO, COORD, STD_OUTPUT_HANDLE,
};

use super::native::{BufferInfo, ConsoleApi};

fn check(result: i32) -> io::Result<()> {
    if result != 0 {
        Ok(())
    } else {
        Err(io::Error::last_os_error())
    }
}

/// The console attached to standard output.
///
/// Text goes through [`io::Stdout`] and is flushed before every attribute
/// or cursor change so it lands with the colors it was written under.
pub struct Win32Console {
    handle: HANDLE,
    out: io::Stdout,
}

impl Win32Console {
    pub fn stdout() -> Self {
        let handle = unsafe { GetStdHandle(STD_OUTPUT_HANDLE) };
        Self {
            handle,
            out: io::stdout(),
        }
    }

    fn has_handle(&self) -> bool {
        self.handle != 0 && self.handle != INVALID_HANDLE_VALUE
    }
}

impl ConsoleApi for Win32Console {
    fn buffer_info(&mut self) -> Option<BufferInfo> {
        if !self.has_handle() {
            return None;
        }
        let mut info = unsafe { std::mem::zeroed::<CONSOLE_SCREEN_BUFFER_INFO>() };
        let result = unsafe { GetConsoleScreenBufferInfo(self.handle, &mut info) };
        if result == 0 {
            // Redirected output has no screen buffer.
            return None;
        }
        Some(BufferInfo {
            width: info.dwSize.X,
            height: info.dwSize.Y,
            cursor_x: info.dwCursorPosition.X,
            cursor_y: info.dwCursorPosition.Y,
            attributes: info.wAttributes,
            window_left: info.srWindow.Left,
            window_top: info.srWindow.Top,
            window_right: info.srWindow.Right,
            window_bottom: info.srWindow.Bottom,
        })
    }

    fn set_attribute(&mut self, attributes: u16) -> io::Result<()> {
        self.out.flush()?;
        check(unsafe { SetConsoleTextAttribute(self.handle, attributes) })
    }

    fn set_cursor_position(&mut self, x: i16, y: i16) -> io::Result<()> {
        self.out.flush()?;
        check(unsafe { SetConsoleCursorPosition(self.handle, COORD { X: x, Y: y }) })
    }

    fn set_title(&mut self, title: &str) -> io::Result<()> {
        let wide: Vec<u16> = title.encode_utf16().chain(std::iter::once(0)).collect();
        check(unsafe { SetConsoleTitleW(wide.as_ptr()) })
    }

    fn write_text(&mut self, text: &str) -> io::Result<()> {
        self.out.write_all(text.as_bytes())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}
