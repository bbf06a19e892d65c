//! Built-in layouts, selectable by name from configuration.

/// Two pellets in a straight corridor.
pub const TINY: &str = "\
%%%%%%%
%P . .%
%%%%%%%";

/// A loop with a ghost guarding one corner.
pub const SMALL: &str = "\
%%%%%%%%%
%P   .  %
% %%% %.%
% %.  % %
%   %%% %
%.G     %
%%%%%%%%%";

/// Open room with pellets spread around two ghosts.
pub const MEDIUM: &str = "\
%%%%%%%%%%%%
%P    .    %
% %%%% %%% %
% .  G    .%
%%% %% %%%%%
%.    .  G %
% %%%%%% %.%
%.         %
%%%%%%%%%%%%";

/// Look up a built-in layout by name.
pub fn by_name(name: &str) -> Option<&'static str> {
    match name {
        "tiny" => Some(TINY),
        "small" => Some(SMALL),
        "medium" => Some(MEDIUM),
        _ => None,
    }
}
