use crate::error::{CodecError, Result};
use crate::model::list::DatumList;
use crate::model::{
    Category, DataForm, Datum, DatumBody, Dictionary, ElemType, FormType, Matrix, Ser, Vector,
    VectorData,
};
use crate::protocol::{ByteOrder, ProtocolReader, ProtocolWriter, WriteLen};
use itertools::Itertools;
use std::fmt;
use std::io::{Read, Write};

pub const CHART_TYPES: [&str; 10] = [
    "CT_AREA",
    "CT_BAR",
    "CT_COLUMN",
    "CT_HISTOGRAM",
    "CT_LINE",
    "CT_PIE",
    "CT_SCATTER",
    "CT_TREND",
    "CT_KLINE",
    "CT_STACK",
];

const KEY_TITLE: &str = "title";
const KEY_CHART_TYPE: &str = "chartType";
const KEY_STACKING: &str = "stacking";
const KEY_DATA: &str = "data";
const KEY_EXTRAS: &str = "extras";

/// Either a single caption, or `[title, x axis, y axis]`.
#[derive(PartialEq, Clone, Debug)]
pub enum ChartTitle {
    Scalar(Datum),
    Vector(Vector),
}

#[derive(Default, PartialEq, Clone, Debug)]
pub struct Chart {
    title: Option<ChartTitle>,
    chart_type: Option<Datum>,
    stacking: Option<Datum>,
    data: Option<Matrix>,
    extras: Option<Dictionary>,
}

impl Chart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: ChartTitle) -> Self {
        self.title = Some(title);
        self
    }

    /// `code` indexes [`CHART_TYPES`].
    pub fn with_chart_type(mut self, code: i32) -> Self {
        self.chart_type = Some(Datum::int(code));
        self
    }

    pub fn with_stacking(mut self, stacking: bool) -> Self {
        self.stacking = Some(Datum::bool(stacking));
        self
    }

    pub fn with_data(mut self, data: Matrix) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_extras(mut self, extras: Dictionary) -> Self {
        self.extras = Some(extras);
        self
    }

    pub fn title(&self) -> String {
        match &self.title {
            None => String::new(),
            Some(ChartTitle::Scalar(dat)) => dat.to_string(),
            Some(ChartTitle::Vector(v)) => v.element_string(0).unwrap_or_default(),
        }
    }

    fn axis_name(&self, i: usize) -> String {
        match &self.title {
            Some(ChartTitle::Vector(v)) => v.element_string(i).unwrap_or_default(),
            _ => String::new(),
        }
    }

    pub fn x_axis_name(&self) -> String {
        self.axis_name(1)
    }

    pub fn y_axis_name(&self) -> String {
        self.axis_name(2)
    }

    /// `CT_*` name of the chart type code, if it is a known one.
    pub fn chart_type(&self) -> Option<&'static str> {
        let code = self.chart_type.as_ref()?.as_i64().ok()?;
        usize::try_from(code)
            .ok()
            .and_then(|i| CHART_TYPES.get(i))
            .copied()
    }

    pub fn stacking(&self) -> Option<bool> {
        self.stacking.as_ref()?.as_bool().ok()
    }

    pub fn data(&self) -> Option<&Matrix> {
        self.data.as_ref()
    }

    pub fn extras(&self) -> Option<&Dictionary> {
        self.extras.as_ref()
    }

    /// Number of present entries.
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Present entries, in wire order.
    fn entries(&self) -> Vec<(&'static str, DataForm)> {
        let mut entries = vec![];
        match &self.title {
            Some(ChartTitle::Scalar(dat)) => entries.push((KEY_TITLE, DataForm::from(dat.clone()))),
            Some(ChartTitle::Vector(v)) => entries.push((KEY_TITLE, DataForm::from(v.clone()))),
            None => {}
        }
        if let Some(dat) = &self.chart_type {
            entries.push((KEY_CHART_TYPE, DataForm::from(dat.clone())));
        }
        if let Some(dat) = &self.stacking {
            entries.push((KEY_STACKING, DataForm::from(dat.clone())));
        }
        if let Some(m) = &self.data {
            entries.push((KEY_DATA, DataForm::from(m.clone())));
        }
        if let Some(d) = &self.extras {
            entries.push((KEY_EXTRAS, DataForm::from(d.clone())));
        }
        entries
    }

    pub(crate) fn deser_body<R: Read>(r: &mut ProtocolReader<R>, bo: ByteOrder) -> Result<Self> {
        let keys = Vector::deser(r, bo)?;
        let values = Vector::deser(r, bo)?;
        let forms = match values.into_data() {
            VectorData::Plain(list) if list.ty() == ElemType::Any => list,
            other => {
                return Err(CodecError::type_mismatch(
                    ElemType::Any,
                    Vector::from(other).type_byte().name(),
                ))
            }
        };

        let mut chart = Chart::default();
        for (i, key) in keys.string_list().iter().enumerate() {
            let form = match forms.get(i)?.into_body() {
                DatumBody::Any(form) => *form,
                _ => continue,
            };
            let wrong = |form: &DataForm| {
                CodecError::type_mismatch(format!("{key} form"), form.form_type().name())
            };
            match (key.as_str(), form) {
                (KEY_TITLE, DataForm::Scalar(dat)) => chart.title = Some(ChartTitle::Scalar(dat)),
                (KEY_TITLE, DataForm::Vector(v)) => chart.title = Some(ChartTitle::Vector(v)),
                (KEY_CHART_TYPE, DataForm::Scalar(dat)) => chart.chart_type = Some(dat),
                (KEY_STACKING, DataForm::Scalar(dat)) => chart.stacking = Some(dat),
                (KEY_DATA, DataForm::Matrix(m)) => chart.data = Some(m),
                (KEY_EXTRAS, DataForm::Dictionary(d)) => chart.extras = Some(d),
                (KEY_TITLE | KEY_CHART_TYPE | KEY_STACKING | KEY_DATA | KEY_EXTRAS, form) => {
                    return Err(wrong(&form))
                }
                (other, _) => log::debug!("[PARSE] chart entry {} ignored", other),
            }
        }
        Ok(chart)
    }
}

impl Ser for Chart {
    fn ser<W: Write>(&self, w: &mut ProtocolWriter<W>, bo: ByteOrder) -> Result<WriteLen> {
        let (keys, forms): (Vec<_>, Vec<_>) = self.entries().into_iter().unzip();
        let mut w_len = Category::new(FormType::Chart, ElemType::Any).ser(w)?;
        w_len += Vector::new(DatumList::from_strings(ElemType::String, keys)?).ser(w, bo)?;
        w_len += Vector::new(DatumList::from_forms(forms)).ser(w, bo)?;
        Ok(w_len)
    }
}

impl fmt::Display for Chart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Chart({{")?;
        match &self.title {
            Some(ChartTitle::Vector(v)) => {
                writeln!(f, "  title: [{}]", v.string_list().iter().join(" "))?
            }
            Some(ChartTitle::Scalar(dat)) => writeln!(f, "  title: {}", dat)?,
            None => {}
        }
        if self.chart_type.is_some() {
            writeln!(f, "  chartType: {}", self.chart_type().unwrap_or_default())?;
        }
        if let Some(dat) = &self.stacking {
            writeln!(f, "  stacking: {}", dat)?;
        }
        if let Some(m) = &self.data {
            writeln!(f, "  data: {}", m)?;
        }
        if let Some(d) = &self.extras {
            writeln!(f, "  extras: {}", d)?;
        }
        write!(f, "}})")
    }
}
