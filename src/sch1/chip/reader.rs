use crate::sch1::{driver::Sch1Driver, frame::Frame};

use super::{registers::Reg, Sch1};

/// Chained register reads through the sensor's one frame pipeline.
///
/// The answer to a request arrives with the next transaction, so each `read`
/// sends its own request and stores the answer of the previous one. `end`
/// repeats the last request to clock out the final answer.
pub struct Reader<'r, 'a, D: Sch1Driver> {
    output: Option<&'r mut Frame>,
    last_request: Option<Frame>,
    chip: &'r mut Sch1<'a, D>,
}

impl<'r, 'a, D> Reader<'r, 'a, D>
where
    D: Sch1Driver,
    'a: 'r,
{
    pub fn create(chip: &'r mut Sch1<'a, D>) -> Self {
        Self {
            output: None,
            last_request: None,
            chip,
        }
    }

    async fn read_internal(&mut self, request: Frame) -> Result<(), D::Error> {
        let response = self.chip.driver.transaction(request).await?;
        if let Some(data_out) = self.output.take() {
            *data_out = response;
        }
        self.last_request = Some(request);
        Ok(())
    }

    pub async fn read(mut self, reg: Reg, output: &'r mut Frame) -> Result<Self, D::Error> {
        self.read_internal(reg.read_request()).await?;
        self.output = Some(output);
        Ok(self)
    }

    pub async fn end(mut self) -> Result<(), D::Error> {
        match (self.last_request, self.output.is_some()) {
            (Some(request), true) => self.read_internal(request).await,
            _ => Ok(()),
        }
    }
}
