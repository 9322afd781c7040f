// FFI Facade: exposes the property validator and the DCF table to Python
// as the `_core` extension module.

use crate::display;
use crate::error::ErrorKind;
use crate::pipeline::{self, Pipeline};
use crate::property::{Address, Property, PropertyError};
use crate::table::{DcfTable, TableError, YearRecord};
use pyo3::exceptions::{PyKeyError, PyTypeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::{PyBool, PyDict, PyFloat, PyInt, PyList, PyString, PyTuple};
use serde_json::Value;

fn kind_to_py_err(kind: ErrorKind, msg: String) -> PyErr {
    match kind {
        ErrorKind::Type => PyTypeError::new_err(msg),
        ErrorKind::Value => PyValueError::new_err(msg),
        ErrorKind::Missing => PyKeyError::new_err(msg),
    }
}

impl From<PropertyError> for PyErr {
    fn from(e: PropertyError) -> Self {
        kind_to_py_err(e.kind(), e.to_string())
    }
}

impl From<TableError> for PyErr {
    fn from(e: TableError) -> Self {
        kind_to_py_err(e.kind(), e.to_string())
    }
}

/// Converts plain Python data into the loosely-typed form the validators accept.
///
/// Integers outside the `i64` range become floats, so an address number such as
/// `10**20` is rejected as not being an integer.
fn py_to_json(obj: &Bound<'_, PyAny>) -> PyResult<Value> {
    if obj.is_none() {
        return Ok(Value::Null);
    }
    // bool is a subclass of int; check it first.
    if obj.is_instance_of::<PyBool>() {
        return Ok(Value::Bool(obj.extract::<bool>()?));
    }
    if obj.is_instance_of::<PyInt>() {
        return match obj.extract::<i64>() {
            Ok(n) => Ok(Value::from(n)),
            Err(_) => Ok(float_to_json(obj.extract::<f64>()?)),
        };
    }
    if obj.is_instance_of::<PyFloat>() {
        return Ok(float_to_json(obj.extract::<f64>()?));
    }
    if obj.is_instance_of::<PyString>() {
        return Ok(Value::String(obj.extract::<String>()?));
    }
    if obj.is_instance_of::<PyDict>() {
        let dict = obj.extract::<Bound<'_, PyDict>>()?;
        let mut map = serde_json::Map::new();
        for (k, v) in dict.iter() {
            map.insert(k.str()?.to_string(), py_to_json(&v)?);
        }
        return Ok(Value::Object(map));
    }
    if obj.is_instance_of::<PyTuple>() || obj.is_instance_of::<PyList>() {
        let mut items = Vec::new();
        for item in obj.try_iter()? {
            items.push(py_to_json(&item?)?);
        }
        return Ok(Value::Array(items));
    }
    Err(PyTypeError::new_err(format!(
        "unsupported value of type '{}'",
        obj.get_type().name()?
    )))
}

// NaN and infinities have no JSON number form; their text form parses back to the same float.
fn float_to_json(f: f64) -> Value {
    serde_json::Number::from_f64(f)
        .map(Value::Number)
        .unwrap_or_else(|| Value::String(f.to_string()))
}

#[pyclass(name = "Property", frozen)]
#[derive(Debug, Clone)]
pub struct PyProperty {
    inner: Property,
}

#[pymethods]
impl PyProperty {
    #[new]
    #[pyo3(signature = (name=None, address=None, location=None))]
    pub fn new(
        name: Option<&Bound<'_, PyAny>>,
        address: Option<&Bound<'_, PyAny>>,
        location: Option<&Bound<'_, PyAny>>,
    ) -> PyResult<Self> {
        let name = name.map(py_to_json).transpose()?;
        let address = address.map(py_to_json).transpose()?;
        let location = location.map(py_to_json).transpose()?;
        let inner = Property::from_parts(name.as_ref(), address.as_ref(), location.as_ref())?;
        Ok(Self { inner })
    }

    #[getter]
    pub fn name(&self) -> Option<String> {
        self.inner.name().map(str::to_string)
    }

    #[getter]
    pub fn location(&self) -> Option<(f64, f64)> {
        self.inner.location().map(|l| l.as_tuple())
    }

    #[getter]
    pub fn address<'py>(&self, py: Python<'py>) -> PyResult<Option<Bound<'py, PyAny>>> {
        match self.inner.address() {
            None => Ok(None),
            Some(Address::Text(s)) => Ok(Some(PyString::new(py, s).into_any())),
            Some(Address::Structured(a)) => {
                let dict = PyDict::new(py);
                let record = serde_json::to_value(a).map_err(|e| PyValueError::new_err(e.to_string()))?;
                if let Value::Object(map) = record {
                    for (k, v) in map {
                        match v {
                            Value::Number(n) => dict.set_item(k, n.as_i64())?,
                            Value::String(s) => dict.set_item(k, s)?,
                            _ => {}
                        }
                    }
                }
                Ok(Some(dict.into_any()))
            }
        }
    }

    pub fn to_json(&self) -> PyResult<String> {
        serde_json::to_string(&self.inner).map_err(|e| PyValueError::new_err(e.to_string()))
    }

    pub fn __repr__(&self) -> String {
        format!("Property(name={:?}, location={:?})", self.inner.name(), self.location())
    }
}

#[pyclass(name = "DcfTable")]
#[derive(Debug, Clone)]
pub struct PyDcfTable {
    inner: DcfTable,
}

#[pymethods]
impl PyDcfTable {
    #[new]
    pub fn new(row_names: Vec<String>, initial_year: i32, num_years: usize) -> PyResult<Self> {
        Ok(Self { inner: DcfTable::new(row_names, initial_year, num_years)? })
    }

    #[staticmethod]
    pub fn from_json(data: &str) -> PyResult<Self> {
        let inner = serde_json::from_str(data).map_err(|e| PyValueError::new_err(e.to_string()))?;
        Ok(Self { inner })
    }

    pub fn to_json(&self) -> PyResult<String> {
        serde_json::to_string(&self.inner).map_err(|e| PyValueError::new_err(e.to_string()))
    }

    #[getter]
    pub fn columns(&self) -> Vec<String> {
        self.inner.column_labels()
    }

    #[getter]
    pub fn index(&self) -> Vec<String> {
        self.inner.row_labels().map(str::to_string).collect()
    }

    pub fn insert_row(&mut self, row_name: String, data: Vec<f64>) -> PyResult<()> {
        Ok(self.inner.insert_row(row_name, data)?)
    }

    /// `data` is a dict with a `"year"` key plus one numeric entry per row.
    pub fn insert_by_year(&mut self, data: &Bound<'_, PyDict>) -> PyResult<()> {
        let record = year_record(data)?;
        Ok(self.inner.insert_record(&record)?)
    }

    pub fn insert_batch(&mut self, data_list: Vec<Bound<'_, PyDict>>) -> PyResult<()> {
        let records = data_list.iter().map(year_record).collect::<PyResult<Vec<_>>>()?;
        Ok(self.inner.insert_batch(&records)?)
    }

    pub fn replicate_first_column(&self) -> Self {
        Self { inner: self.inner.replicate_first_column() }
    }

    pub fn get(&self, row_name: &str, year: i32) -> Option<f64> {
        self.inner.get(row_name, year)
    }

    pub fn row(&self, row_name: &str) -> Option<Vec<Option<f64>>> {
        self.inner.row(row_name).map(<[Option<f64>]>::to_vec)
    }

    pub fn values(&self, row_name: &str) -> PyResult<Vec<f64>> {
        Ok(self.inner.values(row_name)?)
    }

    pub fn __str__(&self) -> String {
        display::render(&self.inner)
    }
}

fn year_record(data: &Bound<'_, PyDict>) -> PyResult<YearRecord> {
    let value = py_to_json(data.as_any())?;
    serde_json::from_value(value).map_err(|e| PyValueError::new_err(e.to_string()))
}

#[pyfunction]
fn calculate_vacancy(mut dcf: PyRefMut<'_, PyDcfTable>, rates: PyRef<'_, PyDcfTable>) -> PyResult<()> {
    Ok(pipeline::calculate_vacancy(&mut dcf.inner, &rates.inner)?)
}

#[pyfunction]
fn calculate_effective_gross_income(mut dcf: PyRefMut<'_, PyDcfTable>) -> PyResult<()> {
    Ok(pipeline::calculate_effective_gross_income(&mut dcf.inner)?)
}

#[pyfunction]
fn calculate_total_expenses(mut dcf: PyRefMut<'_, PyDcfTable>) -> PyResult<()> {
    Ok(pipeline::calculate_total_expenses(&mut dcf.inner)?)
}

#[pyfunction]
fn calculate_net_operating_income(mut dcf: PyRefMut<'_, PyDcfTable>) -> PyResult<()> {
    Ok(pipeline::calculate_net_operating_income(&mut dcf.inner)?)
}

#[pyfunction]
fn calculate_cash_flow_before_financing(mut dcf: PyRefMut<'_, PyDcfTable>) -> PyResult<()> {
    Ok(pipeline::calculate_cash_flow_before_financing(&mut dcf.inner)?)
}

#[pyfunction]
fn calculate_cash_flow_after_financing(mut dcf: PyRefMut<'_, PyDcfTable>) -> PyResult<()> {
    Ok(pipeline::calculate_cash_flow_after_financing(&mut dcf.inner)?)
}

#[pyfunction]
#[pyo3(signature = (dcf, rates=None))]
fn run_pipeline(mut dcf: PyRefMut<'_, PyDcfTable>, rates: Option<PyRef<'_, PyDcfTable>>) -> PyResult<()> {
    let rates = rates.as_ref().map(|r| &r.inner);
    Ok(Pipeline::standard().run(&mut dcf.inner, rates)?)
}

#[pyfunction]
#[pyo3(signature = (dcf, row_name, rates=None))]
fn trace_row(dcf: PyRef<'_, PyDcfTable>, row_name: &str, rates: Option<PyRef<'_, PyDcfTable>>) -> String {
    let rates = rates.as_ref().map(|r| &r.inner);
    display::format_trace(&Pipeline::standard(), &dcf.inner, rates, row_name)
}

/// This function defines the `refin_core._core` Python module.
/// The name `_core` is chosen to indicate it's an internal, compiled component.
#[pymodule]
fn _core(_py: Python, m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyProperty>()?;
    m.add_class::<PyDcfTable>()?;
    m.add_function(wrap_pyfunction!(calculate_vacancy, m)?)?;
    m.add_function(wrap_pyfunction!(calculate_effective_gross_income, m)?)?;
    m.add_function(wrap_pyfunction!(calculate_total_expenses, m)?)?;
    m.add_function(wrap_pyfunction!(calculate_net_operating_income, m)?)?;
    m.add_function(wrap_pyfunction!(calculate_cash_flow_before_financing, m)?)?;
    m.add_function(wrap_pyfunction!(calculate_cash_flow_after_financing, m)?)?;
    m.add_function(wrap_pyfunction!(run_pipeline, m)?)?;
    m.add_function(wrap_pyfunction!(trace_row, m)?)?;
    Ok(())
}
