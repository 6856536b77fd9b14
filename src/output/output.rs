#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::rc::Rc;

pub trait Output {
    fn print(&mut self, text: &str);
}

pub struct StdOutput;

impl StdOutput {
    pub fn new() -> Self {
        Self
    }
}

impl Output for StdOutput {
    fn print(&mut self, text: &str) {
        println!("{}", text);
    }
}

pub struct StdErrOutput;

impl StdErrOutput {
    pub fn new() -> Self {
        Self
    }
}

impl Output for StdErrOutput {
    fn print(&mut self, text: &str) {
        eprintln!("{}", text);
    }
}

/// Collects printed lines in memory. Clones share the same buffer.
#[cfg(test)]
#[derive(Clone, Default)]
pub struct MemoryOutput {
    lines: Rc<RefCell<Vec<String>>>,
}

#[cfg(test)]
impl MemoryOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.borrow().clone()
    }

    pub fn contents(&self) -> String {
        self.lines.borrow().join("\n")
    }

    pub fn clear(&self) {
        self.lines.borrow_mut().clear();
    }
}

#[cfg(test)]
impl Output for MemoryOutput {
    fn print(&mut self, text: &str) {
        self.lines
            .borrow_mut()
            .extend(text.lines().map(|line| line.to_string()));
    }
}

pub struct OutputStreams {
    pub stdout: Box<dyn Output>,
    pub stderr: Box<dyn Output>,
}

impl OutputStreams {
    pub fn new(stdout: Box<dyn Output>, stderr: Box<dyn Output>) -> Self {
        Self { stdout, stderr }
    }

    pub fn default() -> Self {
        Self {
            stdout: Box::new(StdOutput::new()),
            stderr: Box::new(StdErrOutput::new()),
        }
    }
}
