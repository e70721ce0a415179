use forecast_lib::{ForecastError, ForecastModel};
use serde::{Deserialize, Serialize};

/// Fitted SARIMA(p,d,q)(P,D,Q,s) parameters as exported from training.
///
/// `history` holds the most recent observations (oldest first), enough to
/// undo the differencing and seed the autoregressive terms. `residuals` are
/// the matching in-sample errors; missing ones are taken as zero.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ArimaParams {
    pub order : (usize, usize, usize),
    #[serde(default)]
    pub seasonal_order : (usize, usize, usize, usize),
    #[serde(default)]
    pub constant : f64,
    #[serde(default)]
    pub ar : Vec<f64>,
    #[serde(default)]
    pub ma : Vec<f64>,
    #[serde(default)]
    pub seasonal_ar : Vec<f64>,
    #[serde(default)]
    pub seasonal_ma : Vec<f64>,
    pub history : Vec<f64>,
    #[serde(default)]
    pub residuals : Vec<f64>
}

/// Forecasts by running the fitted ARMA recursion on the differenced series
/// with future shocks set to zero, then integrating back to price levels.
#[derive(Debug)]
pub struct ArimaModel {
    params : ArimaParams,
    // Expanded lag polynomials, index 0 is lag 1.
    ar_lags : Vec<f64>,
    ma_lags : Vec<f64>,
    difference_lags : Vec<usize>
}

impl ArimaModel {
    pub fn from_params(params : ArimaParams) -> Result<ArimaModel, ForecastError> {
        let (p, d, q) = params.order;
        let (seasonal_p, seasonal_d, seasonal_q, period) = params.seasonal_order;

        check_count("ar", params.ar.len(), p)?;
        check_count("ma", params.ma.len(), q)?;
        check_count("seasonal_ar", params.seasonal_ar.len(), seasonal_p)?;
        check_count("seasonal_ma", params.seasonal_ma.len(), seasonal_q)?;

        let is_seasonal = seasonal_p + seasonal_d + seasonal_q > 0;
        if is_seasonal && period < 2 {
            return Err(ForecastError::ModelLoad(format!("Seasonal period must be at least 2 (was {})", period)));
        }

        let finite = |values : &[f64]| values.iter().all(|v| v.is_finite());
        if !params.constant.is_finite() || !finite(&params.ar) || !finite(&params.ma) || !finite(&params.seasonal_ar)
            || !finite(&params.seasonal_ma) || !finite(&params.history) || !finite(&params.residuals) {
            return Err(ForecastError::ModelLoad(String::from("Model parameters contain non-finite values")));
        }

        let ar_lags = expand_lags(&negated(&params.ar), &negated(&params.seasonal_ar), period)
            .iter().map(|c| -c).collect();
        let ma_lags = expand_lags(&params.ma, &params.seasonal_ma, period);

        let mut difference_lags = vec!(1; d);
        difference_lags.extend(std::iter::repeat(period).take(seasonal_d));

        let differenced_len = params.history.len() as i64 - difference_lags.iter().sum::<usize>() as i64;
        let required_len = std::cmp::max(1, p + seasonal_p * period) as i64;
        if differenced_len < required_len {
            return Err(ForecastError::ModelLoad(format!(
                "History of {} observations is too short for {}, at least {} are needed",
                params.history.len(), describe(&params), params.history.len() as i64 - differenced_len + required_len)));
        }

        Ok(ArimaModel { params, ar_lags, ma_lags, difference_lags })
    }

    fn forecast_differenced(&self, levels : &[f64], steps : usize) -> Vec<f64> {
        let mut series = levels.to_vec();
        let n = series.len();

        // Residuals line up with the end of the differenced series.
        let mut shocks = vec!(0.0; n + steps);
        let known = std::cmp::min(self.params.residuals.len(), n);
        shocks[n - known..n].copy_from_slice(&self.params.residuals[self.params.residuals.len() - known..]);

        for t in n..n + steps {
            let mut value = self.params.constant;
            for (i, coefficient) in self.ar_lags.iter().enumerate() {
                value += coefficient * series[t - i - 1];
            }
            for (i, coefficient) in self.ma_lags.iter().enumerate() {
                if t > i {
                    value += coefficient * shocks[t - i - 1];
                }
            }
            series.push(value);
        }

        series.split_off(n)
    }
}

impl ForecastModel for ArimaModel {
    fn name(&self) -> String {
        describe(&self.params)
    }

    fn forecast(&mut self, steps : u32) -> anyhow::Result<Vec<f64>> {
        let mut levels = vec!(self.params.history.clone());
        for lag in &self.difference_lags {
            let differenced = difference(levels.last().map(|l| l.as_slice()).unwrap_or(&[]), *lag);
            levels.push(differenced);
        }

        let mut forecast = match levels.last() {
            Some(last_level) => self.forecast_differenced(last_level, steps as usize),
            None => Vec::new()
        };
        for (level, lag) in levels.iter().zip(self.difference_lags.iter()).rev() {
            forecast = integrate(level, *lag, &forecast);
        }

        Ok(forecast)
    }
}

fn check_count(name : &str, actual : usize, expected : usize) -> Result<(), ForecastError> {
    if actual != expected {
        return Err(ForecastError::ModelLoad(format!("Expected {} {} coefficients, found {}", expected, name, actual)));
    }
    Ok(())
}

fn describe(params : &ArimaParams) -> String {
    let (p, d, q) = params.order;
    let (seasonal_p, seasonal_d, seasonal_q, period) = params.seasonal_order;
    if seasonal_p + seasonal_d + seasonal_q > 0 {
        format!("SARIMA({},{},{})({},{},{},{})", p, d, q, seasonal_p, seasonal_d, seasonal_q, period)
    }
    else {
        format!("ARIMA({},{},{})", p, d, q)
    }
}

fn negated(values : &[f64]) -> Vec<f64> {
    values.iter().map(|v| -v).collect()
}

/// Multiplies `(1 + sum a_i B^i)(1 + sum b_j B^(j*period))` and returns the
/// coefficients of lags 1 and up.
fn expand_lags(short : &[f64], seasonal : &[f64], period : usize) -> Vec<f64> {
    let mut short_poly = vec!(1.0);
    short_poly.extend_from_slice(short);
    let mut seasonal_poly = vec!(0.0; seasonal.len() * period + 1);
    seasonal_poly[0] = 1.0;
    for (j, coefficient) in seasonal.iter().enumerate() {
        seasonal_poly[(j + 1) * period] = *coefficient;
    }

    let mut product = vec!(0.0; short_poly.len() + seasonal_poly.len() - 1);
    for (i, a) in short_poly.iter().enumerate() {
        for (j, b) in seasonal_poly.iter().enumerate() {
            product[i + j] += a * b;
        }
    }

    product.split_off(1)
}

fn difference(series : &[f64], lag : usize) -> Vec<f64> {
    series.iter().skip(lag).zip(series.iter()).map(|(current, previous)| current - previous).collect()
}

fn integrate(base : &[f64], lag : usize, differences : &[f64]) -> Vec<f64> {
    let mut extended = base.to_vec();
    for d in differences {
        let previous = extended[extended.len() - lag];
        extended.push(previous + d);
    }

    extended.split_off(base.len())
}
