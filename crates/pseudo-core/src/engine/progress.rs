/// Events emitted while a folder of pseudopotentials is turned into a family.
#[derive(Debug, Clone)]
pub enum Progress {
    ScanStart { total_files: u64 },
    FileParsed { filename: String, element: &'static str },
    ScanFinish,

    Storing { label: String },
    Stored { members: usize },
}

pub type ProgressCallback<'a> = Box<dyn Fn(Progress) + Send + Sync + 'a>;

#[derive(Default)]
pub struct ProgressReporter<'a> {
    callback: Option<ProgressCallback<'a>>,
}

impl<'a> ProgressReporter<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: ProgressCallback<'a>) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    #[inline]
    pub fn report(&self, event: Progress) {
        if let Some(cb) = &self.callback {
            cb(event);
        }
    }
}
