use crate::args::InitArgs;
use anyhow::{anyhow, bail, Context, Result};
use sedfit_core::evolution::{
    CrossoverConfig, CrossoverModel, GeneticSettings, MutationConfig, MutationModel,
    SelectionConfig,
};
use sedfit_core::params::{FreeParameter, ParameterRange, ParameterScale, ParameterSet};

const DEFAULT_NDIGITS: usize = 4;

/// Parse one `label:min:max[:scale[:ndigits[:unit]]]` parameter spec.
pub fn parse_parameter_spec(spec: &str) -> Result<FreeParameter> {
    let fields: Vec<&str> = spec.split(':').collect();
    if fields.len() < 3 || fields.len() > 6 {
        bail!("invalid parameter spec '{spec}': expected label:min:max[:scale[:ndigits[:unit]]]");
    }
    let label = fields[0].trim();
    if label.is_empty() {
        bail!("invalid parameter spec '{spec}': empty label");
    }
    let min: f64 = fields[1]
        .parse()
        .with_context(|| format!("invalid minimum in parameter spec '{spec}'"))?;
    let max: f64 = fields[2]
        .parse()
        .with_context(|| format!("invalid maximum in parameter spec '{spec}'"))?;
    let scale = match fields.get(3).copied() {
        None | Some("lin") => ParameterScale::Linear,
        Some("log") => ParameterScale::Log,
        Some(other) => bail!("invalid scale '{other}' in parameter spec '{spec}' (lin or log)"),
    };
    let ndigits = match fields.get(4) {
        None => DEFAULT_NDIGITS,
        Some(field) => field
            .parse()
            .with_context(|| format!("invalid digit count in parameter spec '{spec}'"))?,
    };
    let unit = fields.get(5).map(|u| u.to_string());

    let range = ParameterRange::new(min, max)
        .map_err(|e| anyhow!("invalid range in parameter spec '{spec}': {e}"))?;
    FreeParameter::new(label, "", unit, range, scale, ndigits)
        .map_err(|e| anyhow!("invalid parameter spec '{spec}': {e}"))
}

/// Build the parameter set from the repeated `-p` specs.
pub fn build_parameter_set(specs: &[String]) -> Result<ParameterSet> {
    let parameters = specs
        .iter()
        .map(|spec| parse_parameter_spec(spec))
        .collect::<Result<Vec<_>>>()?;
    ParameterSet::new(parameters).map_err(|e| anyhow!("invalid parameter set: {e}"))
}

/// Build the genetic settings from the init arguments.
pub fn build_genetic_settings(args: &InitArgs) -> Result<GeneticSettings> {
    let mutation = match args.mutation_model.as_str() {
        "uniform" => MutationConfig::new(args.mutation_rate, MutationModel::Uniform),
        "gaussian" => MutationConfig::new(
            args.mutation_rate,
            MutationModel::Gaussian {
                sigma_fraction: args.mutation_sigma,
            },
        ),
        other => bail!("unknown mutation model '{other}' (uniform or gaussian)"),
    }
    .map_err(|e| anyhow!("invalid mutation settings: {e}"))?;

    let crossover_model = match args.crossover_model.as_str() {
        "one-point" => CrossoverModel::OnePoint,
        "uniform" => CrossoverModel::Uniform,
        "blend" => CrossoverModel::Blend {
            alpha: args.blend_alpha,
        },
        other => bail!("unknown crossover model '{other}' (one-point, uniform, or blend)"),
    };
    let crossover = CrossoverConfig::new(args.crossover_rate, crossover_model)
        .map_err(|e| anyhow!("invalid crossover settings: {e}"))?;

    let selection = match args.selection.as_str() {
        "tournament" => SelectionConfig::tournament(args.tournament_size)
            .map_err(|e| anyhow!("invalid selection settings: {e}"))?,
        "roulette" => SelectionConfig::roulette(),
        other => bail!("unknown selection model '{other}' (tournament or roulette)"),
    };

    let settings = GeneticSettings {
        population_size: args.population_size,
        mutation,
        crossover,
        selection,
        n_elites: args.elites,
    };
    settings
        .validate()
        .map_err(|e| anyhow!("invalid genetic settings: {e}"))?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_spec() {
        let p = parse_parameter_spec("inclination:0:90").unwrap();
        assert_eq!(p.label, "inclination");
        assert_eq!(p.scale, ParameterScale::Linear);
        assert_eq!(p.ndigits, DEFAULT_NDIGITS);
        assert!(p.unit.is_none());
    }

    #[test]
    fn test_full_spec() {
        let p = parse_parameter_spec("dust_mass:1e5:1e9:log:6:Msun").unwrap();
        assert_eq!(p.label, "dust_mass");
        assert_eq!(p.scale, ParameterScale::Log);
        assert_eq!(p.ndigits, 6);
        assert_eq!(p.unit.as_deref(), Some("Msun"));
        assert_eq!(p.range.min, 1e5);
        assert_eq!(p.range.max, 1e9);
    }

    #[test]
    fn test_bad_specs() {
        assert!(parse_parameter_spec("only_label").is_err());
        assert!(parse_parameter_spec("x:abc:2").is_err());
        assert!(parse_parameter_spec("x:5:1").is_err());
        assert!(parse_parameter_spec("x:1:5:cubic").is_err());
        assert!(parse_parameter_spec("mass:0:10:log").is_err());
    }

    #[test]
    fn test_duplicate_labels_rejected() {
        let specs = vec!["a:0:1".to_string(), "a:2:3".to_string()];
        assert!(build_parameter_set(&specs).is_err());
    }
}
