mod end_to_end;
mod parser_props;
mod view_switch;
